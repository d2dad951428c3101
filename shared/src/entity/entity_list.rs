use std::{
    any::Any,
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use log::trace;

use crate::{
    entity::{Entity, EntityError, Lifecycle},
    visitor::{VisitError, Visitor},
    EntityId, EntityType, Tick,
};

cfg_if! {
    if #[cfg(feature = "parallel")] {
        use rayon::prelude::*;

        fn fan_out(children: &[Arc<dyn Entity>], visitor: &dyn Visitor) -> Vec<Result<(), VisitError>> {
            children.par_iter().map(|child| child.accept(visitor)).collect()
        }
    } else {
        fn fan_out(children: &[Arc<dyn Entity>], visitor: &dyn Visitor) -> Vec<Result<(), VisitError>> {
            children.iter().map(|child| child.accept(visitor)).collect()
        }
    }
}

/// Composite entity owning a set of uniquely keyed children.
///
/// Structural changes take the write lock; visitor passes snapshot the
/// children under the read lock and release it before descending.
pub struct EntityList {
    id: EntityId,
    lifecycle: Lifecycle,
    children: RwLock<BTreeMap<EntityId, Arc<dyn Entity>>>,
}

impl EntityList {
    pub fn new(id: impl Into<EntityId>, start: Tick) -> Self {
        Self {
            id: id.into(),
            lifecycle: Lifecycle::new(start),
            children: RwLock::new(BTreeMap::new()),
        }
    }

    /// Adds a direct child. Fails if a child with the same id exists, or if
    /// `entity` is a composite that already contains this list.
    pub fn add(&self, entity: Arc<dyn Entity>) -> Result<(), EntityError> {
        if let Some(list) = entity.children() {
            if list.contains_list(self)? {
                return Err(EntityError::Cycle {
                    list: self.id.clone(),
                    id: entity.id().clone(),
                });
            }
        }

        let mut children = self.children.write().map_err(|_| EntityError::LockPoisoned)?;
        if children.contains_key(entity.id()) {
            return Err(EntityError::Duplicate {
                list: self.id.clone(),
                id: entity.id().clone(),
            });
        }
        children.insert(entity.id().clone(), entity);
        Ok(())
    }

    /// Direct child lookup.
    pub fn get(&self, id: &EntityId) -> Result<Option<Arc<dyn Entity>>, EntityError> {
        let children = self.children.read().map_err(|_| EntityError::LockPoisoned)?;
        Ok(children.get(id).cloned())
    }

    /// Depth-first lookup through nested composites.
    pub fn find(&self, id: &EntityId) -> Result<Option<Arc<dyn Entity>>, EntityError> {
        for child in self.entities()? {
            if child.id() == id {
                return Ok(Some(child));
            }
            if let Some(list) = child.children() {
                if let Some(found) = list.find(id)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }

    /// Snapshot of the direct children in id order.
    pub fn entities(&self) -> Result<Vec<Arc<dyn Entity>>, EntityError> {
        let children = self.children.read().map_err(|_| EntityError::LockPoisoned)?;
        Ok(children.values().cloned().collect())
    }

    /// Every descendant in pre-order, dead entities included.
    pub fn walk(&self) -> Result<Vec<Arc<dyn Entity>>, EntityError> {
        let mut out = Vec::new();
        for child in self.entities()? {
            let nested = match child.children() {
                Some(list) => list.walk()?,
                None => Vec::new(),
            };
            out.push(child);
            out.extend(nested);
        }
        Ok(out)
    }

    pub fn len(&self) -> Result<usize, EntityError> {
        let children = self.children.read().map_err(|_| EntityError::LockPoisoned)?;
        Ok(children.len())
    }

    pub fn is_empty(&self) -> Result<bool, EntityError> {
        Ok(self.len()? == 0)
    }

    fn contains_list(&self, target: &EntityList) -> Result<bool, EntityError> {
        if std::ptr::eq(self, target) {
            return Ok(true);
        }
        for child in self.entities()? {
            if let Some(list) = child.children() {
                if list.contains_list(target)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl Entity for EntityList {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn entity_type(&self) -> EntityType {
        EntityType::EntityList
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn children(&self) -> Option<&EntityList> {
        Some(self)
    }

    /// Visits the list itself, then every child concurrently. All children
    /// run to completion; the first failure in id order is returned.
    fn accept(&self, visitor: &dyn Visitor) -> Result<(), VisitError> {
        visitor.visit(self)?;

        let children = self.entities()?;
        let results = fan_out(&children, visitor);

        let mut failures = results.into_iter().filter_map(Result::err);
        match failures.next() {
            Some(err) => {
                trace!(
                    "{} visitor failed on {} of {} children of {}",
                    visitor.fsm_type(),
                    failures.count() + 1,
                    children.len(),
                    self.id
                );
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
