use std::{collections::BTreeSet, sync::Mutex};

use downflux_shared::{CurveCategory, EntityId};

use crate::error::ExecutorError;

/// Entities and curves changed since the last pop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dirty {
    pub entities: BTreeSet<EntityId>,
    pub curves: BTreeSet<(EntityId, CurveCategory)>,
}

impl Dirty {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.curves.is_empty()
    }

    pub fn has_entity(&self, entity_id: &EntityId) -> bool {
        self.entities.contains(entity_id)
    }

    pub fn has_curve(&self, entity_id: &EntityId, category: CurveCategory) -> bool {
        self.curves.contains(&(entity_id.clone(), category))
    }
}

/// Dirty marks accumulated during a tick, popped atomically for broadcast.
#[derive(Debug, Default)]
pub struct DirtyList {
    dirty: Mutex<Dirty>,
}

impl DirtyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&self, entity_id: EntityId) -> Result<(), ExecutorError> {
        let mut dirty = self.dirty.lock().map_err(|_| ExecutorError::LockPoisoned)?;
        dirty.entities.insert(entity_id);
        Ok(())
    }

    pub fn add_curve(
        &self,
        entity_id: EntityId,
        category: CurveCategory,
    ) -> Result<(), ExecutorError> {
        let mut dirty = self.dirty.lock().map_err(|_| ExecutorError::LockPoisoned)?;
        dirty.curves.insert((entity_id, category));
        Ok(())
    }

    pub fn pop(&self) -> Result<Dirty, ExecutorError> {
        let mut dirty = self.dirty.lock().map_err(|_| ExecutorError::LockPoisoned)?;
        Ok(std::mem::take(&mut *dirty))
    }
}
