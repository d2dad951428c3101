use std::{collections::BTreeMap, sync::Arc};

use log::trace;

use crate::{
    fsm::{FsmError, FsmState, Instance},
    EntityId, FsmType, InstanceId,
};

/// Instances of a single FSM type, keyed by instance id.
#[derive(Clone, Debug)]
pub struct InstanceList {
    fsm_type: FsmType,
    instances: BTreeMap<InstanceId, Arc<dyn Instance>>,
}

impl InstanceList {
    pub fn new(fsm_type: FsmType) -> Self {
        Self {
            fsm_type,
            instances: BTreeMap::new(),
        }
    }

    pub fn fsm_type(&self) -> FsmType {
        self.fsm_type
    }

    pub fn get(&self, id: &InstanceId) -> Option<Arc<dyn Instance>> {
        self.instances.get(id).cloned()
    }

    /// First instance acting on `entity_id`, if any.
    pub fn get_by_entity(&self, entity_id: &EntityId) -> Option<Arc<dyn Instance>> {
        self.instances
            .values()
            .find(|instance| instance.entity_id() == entity_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Instance>> {
        self.instances.values()
    }

    pub fn check_type(&self, instance: &dyn Instance) -> Result<(), FsmError> {
        if instance.fsm_type() != self.fsm_type {
            return Err(FsmError::TypeMismatch {
                expected: self.fsm_type,
                actual: instance.fsm_type(),
            });
        }
        Ok(())
    }

    /// Adds an instance. If an instance with the same id is already tracked,
    /// the one with precedence is kept and the displaced one is canceled.
    pub fn add(&mut self, instance: Arc<dyn Instance>) -> Result<(), FsmError> {
        self.check_type(instance.as_ref())?;

        if let Some(existing) = self.instances.get(instance.id()) {
            if Arc::ptr_eq(existing, &instance) {
                return Ok(());
            }
            if !instance.precedence(existing.as_ref()) {
                trace!(
                    "dropping {} instance {}: existing instance takes precedence",
                    self.fsm_type,
                    instance.id()
                );
                return instance.cancel();
            }
            existing.cancel()?;
        }

        self.instances.insert(instance.id().clone(), instance);
        Ok(())
    }

    /// Instances that merging `other` into this list would cancel, checked
    /// without changing either list. Fails if any of them cannot be
    /// canceled from its current state.
    pub fn check_merge(&self, other: &InstanceList) -> Result<Vec<Arc<dyn Instance>>, FsmError> {
        let mut displaced = Vec::new();
        for instance in other.instances.values() {
            self.check_type(instance.as_ref())?;
            let Some(existing) = self.instances.get(instance.id()) else {
                continue;
            };
            if Arc::ptr_eq(existing, instance) {
                continue;
            }
            let loser = if instance.precedence(existing.as_ref()) {
                existing
            } else {
                instance
            };
            if !loser.state()?.is_terminal() {
                loser.transition(FsmState::Canceled, true)?;
            }
            displaced.push(loser.clone());
        }
        Ok(displaced)
    }

    pub fn merge(&mut self, other: &InstanceList) -> Result<(), FsmError> {
        for instance in other.instances.values() {
            self.add(instance.clone())?;
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &InstanceId) -> Option<Arc<dyn Instance>> {
        self.instances.remove(id)
    }

    /// Drops finished and canceled instances.
    pub fn clear(&mut self) -> Result<(), FsmError> {
        let mut terminal = Vec::new();
        for (id, instance) in &self.instances {
            if instance.state()?.is_terminal() {
                terminal.push(id.clone());
            }
        }
        for id in terminal {
            self.instances.remove(&id);
        }
        Ok(())
    }
}
