use thiserror::Error;

use crate::{fsm::FsmState, ErrorKind, FsmType, GroupId};

/// Errors raised by FSM instances and instance lists
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    /// No edge exists between the two states
    #[error("No transition exists between the {from:?} and {to:?} states")]
    InvalidTransition { from: FsmState, to: FsmState },

    /// The edge may only be probed, never taken
    #[error("Real transition {from:?} -> {to:?} cannot occur for a virtual-only edge")]
    VirtualOnlyTransition { from: FsmState, to: FsmState },

    /// Instance added to a list of another FSM type
    #[error("Cannot add instance of type {actual} to a list of type {expected}")]
    TypeMismatch { expected: FsmType, actual: FsmType },

    /// Instance state lock is poisoned
    #[error("FSM state lock is poisoned - a panic occurred while holding it")]
    LockPoisoned,
}

impl FsmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsmError::InvalidTransition { .. }
            | FsmError::VirtualOnlyTransition { .. }
            | FsmError::TypeMismatch { .. } => ErrorKind::FailedPrecondition,
            FsmError::LockPoisoned => ErrorKind::Internal,
        }
    }
}

/// Errors raised by the command schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The schedule was not constructed to accept this FSM type
    #[error("Schedule does not accept {fsm_type} FSM instances")]
    UnregisteredType { fsm_type: FsmType },

    /// A per-type instance list rejected the operation
    #[error(transparent)]
    Instance(#[from] FsmError),

    /// Schedule lock is poisoned
    #[error("Schedule lock is poisoned - a panic occurred while holding it")]
    LockPoisoned,
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::UnregisteredType { .. } => ErrorKind::FailedPrecondition,
            ScheduleError::Instance(err) => err.kind(),
            ScheduleError::LockPoisoned => ErrorKind::Internal,
        }
    }
}

/// Errors raised while building a conflict group list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// Two groups share at least one FSM type
    #[error("Cannot create FSM group list with conflicting groups {first} and {second}")]
    Conflicting { first: GroupId, second: GroupId },

    /// A group must contain at least one FSM type
    #[error("FSM groups must contain at least one FSM type")]
    EmptyGroup,
}

impl GroupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GroupError::Conflicting { .. } => ErrorKind::FailedPrecondition,
            GroupError::EmptyGroup => ErrorKind::InvalidArgument,
        }
    }
}
