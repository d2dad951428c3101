use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use log::{info, warn};

use downflux_shared::{
    dispatch, ClientId, CurveCategory, CurveError, Entity, EntityId, EntityList, FsmType, GroupList, Instance, InstanceId,
    Position, Schedule, StageError, Tick, Visitor, VisitorList,
};

use crate::{
    client_list::ClientList,
    command::{CommandError, CommandFailure, CommandFailures},
    config::ServerConfig,
    dirty::{Dirty, DirtyList},
    error::ExecutorError,
    fsm::MoveInstance,
    game_state::{GameState, StateSnapshot},
    pathing::{AbstractGraph, PathFinder, TileMap},
    status::{RunState, Status},
    visitor::MoveVisitor,
};

/// State shared between the executor and the visitors it drives.
#[derive(Clone)]
pub struct Runtime {
    pub status: Arc<Status>,
    pub dirty: Arc<DirtyList>,
    pub failures: Arc<CommandFailures>,
}

impl Runtime {
    pub fn new(tick_duration: Duration) -> Self {
        Self {
            status: Arc::new(Status::new(tick_duration)),
            dirty: Arc::new(DirtyList::new()),
            failures: Arc::new(CommandFailures::new()),
        }
    }
}

/// Outcome of one simulation tick.
#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick: Tick,
    /// Instances canceled by conflict resolution
    pub superseded: Vec<InstanceId>,
    /// Visitor passes that failed on at least one entity
    pub stage_errors: Vec<StageError>,
    /// Commands that failed and must be reported to their clients
    pub command_failures: Vec<CommandFailure>,
    /// State changed during the tick
    pub delta: StateSnapshot,
    pub elapsed: Duration,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.stage_errors.is_empty() && self.command_failures.is_empty()
    }
}

/// The authoritative tick loop.
///
/// Clients call [`Executor::schedule`] from any thread; the simulation loop
/// alone calls [`Executor::tick`] (directly or through [`Executor::run`]).
pub struct Executor {
    config: ServerConfig,
    runtime: Runtime,
    game_state: GameState,
    visitors: VisitorList,
    groups: GroupList,
    intake: Schedule,
    active: Schedule,
    clients: ClientList,
}

impl Executor {
    pub fn new(
        config: ServerConfig,
        runtime: Runtime,
        root: Arc<EntityList>,
        visitors: VisitorList,
    ) -> Result<Self, ExecutorError> {
        let groups = config.fsm.build_groups()?;
        let intake = config.fsm.build_schedule();
        let active = config.fsm.build_schedule();
        let clients = ClientList::new(config.client_id_length)?;
        let game_state = GameState::new(runtime.status.clone(), root);

        Ok(Self {
            config,
            runtime,
            game_state,
            visitors,
            groups,
            intake,
            active,
            clients,
        })
    }

    /// Executor over `map` with the Move visitor and an empty entity tree.
    pub fn standard(
        config: ServerConfig,
        map: TileMap,
        path_finder: Arc<dyn PathFinder>,
    ) -> Result<Self, ExecutorError> {
        let runtime = Runtime::new(config.tick_interval);
        let graph = Arc::new(AbstractGraph::build(&map, config.cluster_size)?);
        let move_visitor: Arc<dyn Visitor> = Arc::new(
            MoveVisitor::new(
                path_finder,
                Arc::new(map),
                graph,
                runtime.dirty.clone(),
                runtime.failures.clone(),
            )
            .with_ticks_per_tile(config.ticks_per_tile)
            .with_lookahead(config.path_lookahead),
        );
        let visitors = VisitorList::new([move_visitor])?;
        let root = Arc::new(EntityList::new("root", 0));

        Self::new(config, runtime, root, visitors)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn status(&self) -> &Arc<Status> {
        &self.runtime.status
    }

    pub fn root(&self) -> &Arc<EntityList> {
        self.game_state.root()
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn visitors(&self) -> &VisitorList {
        &self.visitors
    }

    pub fn add_client(&self) -> Result<ClientId, ExecutorError> {
        self.clients.add()
    }

    pub fn remove_client(&self, client_id: &ClientId) -> Result<bool, ExecutorError> {
        self.clients.remove(client_id)
    }

    pub fn client_exists(&self, client_id: &ClientId) -> Result<bool, ExecutorError> {
        self.clients.contains(client_id)
    }

    /// Adds a spawned entity under the root and marks it and its curves
    /// dirty.
    pub fn add_entity(&self, entity: Arc<dyn Entity>) -> Result<(), ExecutorError> {
        let entity_id = entity.id().clone();
        let categories = match entity.curves() {
            Some(curves) => curves.categories()?,
            None => Vec::new(),
        };
        self.root().add(entity)?;

        self.runtime.dirty.add_entity(entity_id.clone())?;
        for category in categories {
            self.runtime.dirty.add_curve(entity_id.clone(), category)?;
        }
        Ok(())
    }

    /// Marks an entity dead from `tick` onward.
    pub fn delete_entity(&self, entity_id: &EntityId, tick: Tick) -> Result<(), ExecutorError> {
        let entity = self
            .root()
            .find(entity_id)?
            .ok_or_else(|| ExecutorError::UnknownEntity {
                entity_id: entity_id.clone(),
            })?;
        entity.delete(tick)?;
        self.runtime.dirty.add_entity(entity_id.clone())
    }

    /// Queues an instance for the next tick.
    ///
    /// The issuing client must be registered and a visitor must drive the
    /// instance's FSM type; otherwise nothing is queued.
    pub fn schedule(&self, instance: Arc<dyn Instance>) -> Result<(), ExecutorError> {
        self.clients.check(instance.client_id())?;
        let fsm_type = instance.fsm_type();
        if self.visitors.visitor(fsm_type).is_none() {
            return Err(CommandError::Unimplemented { fsm_type }.into());
        }
        self.intake.add(instance)?;
        Ok(())
    }

    /// Queues a Move order issued at the current tick. The entity must
    /// exist and carry a position curve.
    pub fn schedule_move(
        &self,
        client_id: ClientId,
        entity_id: EntityId,
        destination: Position,
    ) -> Result<InstanceId, ExecutorError> {
        let Some(entity) = self.root().find(&entity_id)? else {
            return Err(ExecutorError::UnknownEntity { entity_id });
        };
        match entity.curves() {
            Some(curves) => {
                curves.get(CurveCategory::Position)?;
            }
            None => {
                return Err(CurveError::MissingCategory {
                    category: CurveCategory::Position,
                }
                .into())
            }
        }
        let instance = Arc::new(MoveInstance::new(
            client_id,
            entity_id,
            self.status().tick(),
            destination,
        ));
        let id = instance.id().clone();
        self.schedule(instance)?;
        Ok(id)
    }

    /// Number of instances waiting for the next tick.
    pub fn pending(&self) -> Result<usize, ExecutorError> {
        Ok(self.intake.len()?)
    }

    /// Snapshot of the active instances of `fsm_type`.
    pub fn active(&self, fsm_type: FsmType) -> Result<Vec<Arc<dyn Instance>>, ExecutorError> {
        Ok(self.active.get(fsm_type)?.iter().cloned().collect())
    }

    pub fn export(
        &self,
        tick: Tick,
        filter: Option<&Dirty>,
    ) -> Result<StateSnapshot, ExecutorError> {
        self.game_state.export(tick, filter)
    }

    /// Runs one simulation tick.
    ///
    /// Newly scheduled instances are popped from intake, conflicts against
    /// their group siblings are resolved, and the survivors join the active
    /// schedule. Then every visitor passes over the whole tree in
    /// registration order. Visitor and command failures are reported, not
    /// returned; only infrastructure failures abort the tick.
    pub fn tick(&self) -> Result<TickReport, ExecutorError> {
        let started = Instant::now();
        let tick = self.runtime.status.increment_tick();

        self.active.clear()?;
        let batch = self.intake.pop()?;
        let mut superseded = batch.resolve_conflicts(&batch, &self.groups)?;
        superseded.extend(self.active.resolve_conflicts(&batch, &self.groups)?);
        self.active.merge(&batch)?;

        let deadline = self.config.visit_deadline.map(|limit| started + limit);
        let stage_errors = dispatch(
            tick,
            self.root().as_ref(),
            &self.visitors,
            &self.active,
            deadline,
        );

        let command_failures = self.runtime.failures.drain()?;
        let dirty = self.runtime.dirty.pop()?;
        let delta = self
            .game_state
            .export(tick.saturating_sub(self.config.export_window), Some(&dirty))?;

        Ok(TickReport {
            tick,
            superseded: superseded
                .iter()
                .map(|instance| instance.id().clone())
                .collect(),
            stage_errors,
            command_failures,
            delta,
            elapsed: started.elapsed(),
        })
    }

    /// Paces ticks at the configured interval until `stop` is raised or
    /// [`Executor::stop`] is called.
    pub fn run(&self, stop: &AtomicBool) -> Result<(), ExecutorError> {
        let status = &self.runtime.status;
        let mut next = status.set_started()?;
        info!("executor started at tick {}", status.tick());

        while !stop.load(Ordering::Acquire) && !status.is_stopped() {
            let report = self.tick()?;

            next += self.config.tick_interval;
            let now = Instant::now();
            if now < next {
                thread::sleep(next - now);
            } else {
                warn!(
                    "[{}] took too long: execution time {:?} > {:?}",
                    report.tick, report.elapsed, self.config.tick_interval
                );
            }
        }

        if status.run_state() == RunState::Running {
            if let Err(err) = status.set_stopped() {
                if !status.is_stopped() {
                    return Err(err);
                }
            }
        }
        info!("executor stopped at tick {}", status.tick());
        Ok(())
    }

    pub fn stop(&self) -> Result<(), ExecutorError> {
        self.runtime.status.set_stopped()
    }
}
