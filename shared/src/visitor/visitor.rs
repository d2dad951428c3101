use std::time::Instant;

use crate::{entity::Entity, fsm::InstanceList, visitor::VisitError, FsmType, Tick};

/// Per-FSM-type behavior applied to every entity once per tick.
pub trait Visitor: Send + Sync {
    /// Registration key.
    fn fsm_type(&self) -> FsmType;

    /// Called once per tick, before the pass over the entity tree, with the
    /// active instances of this visitor's FSM type.
    fn schedule(&self, _tick: Tick, _instances: &InstanceList) -> Result<(), VisitError> {
        Ok(())
    }

    /// Advances the entity. Entities the visitor does not apply to are a
    /// silent no-op.
    fn visit(&self, entity: &dyn Entity) -> Result<(), VisitError>;
}

/// Wraps a visitor so that entities reached after `deadline` fail with a
/// timeout instead of being visited.
pub struct DeadlineVisitor<'a> {
    inner: &'a dyn Visitor,
    deadline: Instant,
}

impl<'a> DeadlineVisitor<'a> {
    pub fn new(inner: &'a dyn Visitor, deadline: Instant) -> Self {
        Self { inner, deadline }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Visitor for DeadlineVisitor<'_> {
    fn fsm_type(&self) -> FsmType {
        self.inner.fsm_type()
    }

    fn schedule(&self, tick: Tick, instances: &InstanceList) -> Result<(), VisitError> {
        self.inner.schedule(tick, instances)
    }

    fn visit(&self, entity: &dyn Entity) -> Result<(), VisitError> {
        if Instant::now() >= self.deadline {
            return Err(VisitError::Timeout {
                fsm_type: self.inner.fsm_type(),
                entity_id: entity.id().clone(),
            });
        }
        self.inner.visit(entity)
    }
}
