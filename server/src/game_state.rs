use std::sync::Arc;

use downflux_shared::{CurveSnapshot, Entity, EntityId, EntityList, EntityType, Tick};

use crate::{dirty::Dirty, error::ExecutorError, status::Status};

/// Replication metadata of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub start: Tick,
    pub end: Option<Tick>,
}

/// Exported slice of the game state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateSnapshot {
    pub tick: Tick,
    pub entities: Vec<EntitySnapshot>,
    pub curves: Vec<CurveSnapshot>,
}

/// Read side of the simulation: the entity tree plus the clock.
#[derive(Clone)]
pub struct GameState {
    status: Arc<Status>,
    root: Arc<EntityList>,
}

impl GameState {
    pub fn new(status: Arc<Status>, root: Arc<EntityList>) -> Self {
        Self { status, root }
    }

    pub fn status(&self) -> &Arc<Status> {
        &self.status
    }

    pub fn root(&self) -> &Arc<EntityList> {
        &self.root
    }

    /// Exports entity metadata and curve windows starting at `tick`.
    ///
    /// With a `filter`, only entities and curves marked dirty in it are
    /// included; without one the full state is exported.
    pub fn export(
        &self,
        tick: Tick,
        filter: Option<&Dirty>,
    ) -> Result<StateSnapshot, ExecutorError> {
        let mut snapshot = StateSnapshot {
            tick: self.status.tick(),
            ..StateSnapshot::default()
        };

        for entity in self.root.walk()? {
            if filter.map_or(true, |dirty| dirty.has_entity(entity.id())) {
                snapshot.entities.push(EntitySnapshot {
                    id: entity.id().clone(),
                    entity_type: entity.entity_type(),
                    start: entity.start(),
                    end: entity.end(),
                });
            }

            let Some(curves) = entity.curves() else {
                continue;
            };
            for category in curves.categories()? {
                if filter.map_or(true, |dirty| dirty.has_curve(entity.id(), category)) {
                    snapshot.curves.push(curves.get(category)?.export(tick));
                }
            }
        }

        Ok(snapshot)
    }
}
