use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use log::{debug, info, trace};

use downflux_shared::{
    CurveCategory, CurveError, CurveStore, Entity, EntityId, FsmState, FsmType, Instance, InstanceList,
    Position, Tick, VisitError, Visitor,
};

use crate::{
    command::{CommandFailure, CommandFailures, MoveArgs, MoveCommand, DEFAULT_TICKS_PER_TILE},
    dirty::DirtyList,
    error::ExecutorError,
    fsm::MoveInstance,
    pathing::{AbstractGraph, PathFinder, TileMap},
};

#[derive(Default)]
struct Batch {
    tick: Tick,
    instances: BTreeMap<EntityId, Arc<dyn Instance>>,
}

/// Drives Move instances.
///
/// A pending order resolves its path from the entity's current position and
/// commits the resulting curve; an executing order finishes once the entity
/// reaches its destination, and re-plans if a truncated path ran out first.
pub struct MoveVisitor {
    path_finder: Arc<dyn PathFinder>,
    map: Arc<TileMap>,
    graph: Arc<AbstractGraph>,
    dirty: Arc<DirtyList>,
    failures: Arc<CommandFailures>,
    ticks_per_tile: Tick,
    lookahead: usize,
    batch: Mutex<Batch>,
}

impl MoveVisitor {
    pub fn new(
        path_finder: Arc<dyn PathFinder>,
        map: Arc<TileMap>,
        graph: Arc<AbstractGraph>,
        dirty: Arc<DirtyList>,
        failures: Arc<CommandFailures>,
    ) -> Self {
        Self {
            path_finder,
            map,
            graph,
            dirty,
            failures,
            ticks_per_tile: DEFAULT_TICKS_PER_TILE,
            lookahead: 0,
            batch: Mutex::new(Batch::default()),
        }
    }

    pub fn with_ticks_per_tile(mut self, ticks_per_tile: Tick) -> Self {
        self.ticks_per_tile = ticks_per_tile;
        self
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Batch>, VisitError> {
        self.batch.lock().map_err(|_| VisitError::Failed {
            fsm_type: FsmType::MOVE,
            entity_id: EntityId::default(),
            reason: "move batch lock is poisoned".to_string(),
        })
    }

    fn internal(entity_id: &EntityId, err: ExecutorError) -> VisitError {
        VisitError::Failed {
            fsm_type: FsmType::MOVE,
            entity_id: entity_id.clone(),
            reason: err.to_string(),
        }
    }

    fn resolve(
        &self,
        tick: Tick,
        entity_id: &EntityId,
        order: &MoveInstance,
        curves: &CurveStore,
        source: Position,
    ) -> Result<(), VisitError> {
        let command = MoveCommand::new(
            self.path_finder.clone(),
            self.map.clone(),
            self.graph.clone(),
            order.client_id().clone(),
            entity_id.clone(),
            order.destination(),
        )
        .with_ticks_per_tile(self.ticks_per_tile)
        .with_lookahead(self.lookahead);

        match command.execute(MoveArgs { tick, source }) {
            Ok(curve) => {
                curves.commit(CurveCategory::Position, curve.into())?;
                self.dirty
                    .add_curve(entity_id.clone(), CurveCategory::Position)
                    .map_err(|err| Self::internal(entity_id, err))?;
                order.transition(FsmState::Executing, false)?;
            }
            Err(error) => {
                info!(
                    "tick {}: move of {} for client {} failed: {}",
                    tick,
                    entity_id,
                    order.client_id(),
                    error
                );
                self.failures
                    .push(CommandFailure {
                        tick,
                        client_id: order.client_id().clone(),
                        entity_id: entity_id.clone(),
                        instance_id: order.id().clone(),
                        fsm_type: FsmType::MOVE,
                        error,
                    })
                    .map_err(|err| Self::internal(entity_id, err))?;
                order.cancel()?;
            }
        }
        Ok(())
    }
}

impl Visitor for MoveVisitor {
    fn fsm_type(&self) -> FsmType {
        FsmType::MOVE
    }

    fn schedule(&self, tick: Tick, instances: &InstanceList) -> Result<(), VisitError> {
        let mut batch = self.lock()?;
        batch.tick = tick;
        batch.instances.clear();
        for instance in instances.iter() {
            if !instance.state()?.is_terminal() {
                batch
                    .instances
                    .insert(instance.entity_id().clone(), instance.clone());
            }
        }
        trace!("tick {}: {} active move orders", tick, batch.instances.len());
        Ok(())
    }

    fn visit(&self, entity: &dyn Entity) -> Result<(), VisitError> {
        let (tick, instance) = {
            let batch = self.lock()?;
            match batch.instances.get(entity.id()) {
                Some(instance) => (batch.tick, instance.clone()),
                None => return Ok(()),
            }
        };
        let Some(order) = instance.as_any().downcast_ref::<MoveInstance>() else {
            return Ok(());
        };
        let Some(curves) = entity.curves() else {
            debug!("tick {}: canceling move of {}: no curves", tick, entity.id());
            order.cancel()?;
            return Ok(());
        };

        if !entity.is_alive(tick) {
            order.cancel()?;
            return Ok(());
        }

        let stored = match curves.get(CurveCategory::Position) {
            Ok(stored) => stored,
            Err(CurveError::MissingCategory { .. }) => {
                debug!("tick {}: canceling move of {}: no position curve", tick, entity.id());
                order.cancel()?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let Some(position_curve) = stored.as_position() else {
            order.cancel()?;
            return Ok(());
        };
        let current = position_curve.get(tick)?;

        match order.state()? {
            FsmState::Pending => self.resolve(tick, entity.id(), order, curves, current),
            FsmState::Executing => {
                if position_curve.last_tick().map_or(false, |last| last > tick) {
                    return Ok(());
                }
                if current.coordinate() == order.destination().coordinate() {
                    order.transition(FsmState::Finished, false)?;
                    Ok(())
                } else {
                    self.resolve(tick, entity.id(), order, curves, current)
                }
            }
            FsmState::Finished | FsmState::Canceled => Ok(()),
        }
    }
}
