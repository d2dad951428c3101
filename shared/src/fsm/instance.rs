use std::{any::Any, fmt::Debug, sync::Mutex};

use crate::{
    fsm::{Fsm, FsmError, FsmState},
    ClientId, EntityId, FsmType, InstanceId, Tick,
};

/// A scheduled FSM instance, e.g. one Move order for one entity.
///
/// Instances are shared between the intake schedule, the active schedule and
/// the visitor that drives them, so all state changes go through `&self`.
pub trait Instance: Any + Debug + Send + Sync {
    fn id(&self) -> &InstanceId;

    fn fsm_type(&self) -> FsmType;

    /// Entity the instance acts upon.
    fn entity_id(&self) -> &EntityId;

    /// Client that issued the instance.
    fn client_id(&self) -> &ClientId;

    /// Tick at which the instance was issued.
    fn tick(&self) -> Tick;

    fn state(&self) -> Result<FsmState, FsmError>;

    fn transition(&self, to: FsmState, virtual_only: bool) -> Result<(), FsmError>;

    /// Cancels the instance. Canceling an instance that already reached a
    /// terminal state is a no-op.
    fn cancel(&self) -> Result<(), FsmError>;

    /// Whether `self` should displace `other` when both share an id.
    fn precedence(&self, other: &dyn Instance) -> bool {
        self.id() == other.id() && self.tick() >= other.tick()
    }

    fn as_any(&self) -> &dyn Any;
}

/// State holder embedded by concrete instances.
#[derive(Debug)]
pub struct InstanceBase {
    fsm: Fsm,
    state: Mutex<FsmState>,
}

impl InstanceBase {
    pub fn new(fsm: Fsm, state: FsmState) -> Self {
        Self {
            fsm,
            state: Mutex::new(state),
        }
    }

    pub fn fsm_type(&self) -> FsmType {
        self.fsm.fsm_type()
    }

    pub fn state(&self) -> Result<FsmState, FsmError> {
        let state = self.state.lock().map_err(|_| FsmError::LockPoisoned)?;
        Ok(*state)
    }

    /// Validates, and unless `virtual_only` is set applies, a transition from
    /// the current state to `to`.
    pub fn transition(&self, to: FsmState, virtual_only: bool) -> Result<(), FsmError> {
        let mut state = self.state.lock().map_err(|_| FsmError::LockPoisoned)?;
        let from = *state;

        let Some(edge_virtual_only) = self.fsm.edge(from, to) else {
            return Err(FsmError::InvalidTransition { from, to });
        };
        if !virtual_only && edge_virtual_only {
            return Err(FsmError::VirtualOnlyTransition { from, to });
        }

        if !virtual_only {
            *state = to;
        }
        Ok(())
    }

    pub fn cancel(&self) -> Result<(), FsmError> {
        let mut state = self.state.lock().map_err(|_| FsmError::LockPoisoned)?;
        if state.is_terminal() {
            return Ok(());
        }
        let from = *state;
        if self.fsm.edge(from, FsmState::Canceled).is_none() {
            return Err(FsmError::InvalidTransition {
                from,
                to: FsmState::Canceled,
            });
        }
        *state = FsmState::Canceled;
        Ok(())
    }
}
