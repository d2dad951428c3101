use thiserror::Error;

use crate::{
    curve::CurveError,
    entity::EntityError,
    fsm::{FsmError, ScheduleError},
    EntityId, ErrorKind, FsmType,
};

/// Errors raised while applying a visitor to an entity.
///
/// Has no unimplemented variant: a visitor that does not
/// apply to an entity returns `Ok(())`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitError {
    /// The visitor reached the entity after the tick deadline
    #[error("{fsm_type} visitor reached entity {entity_id} after the tick deadline")]
    Timeout {
        fsm_type: FsmType,
        entity_id: EntityId,
    },

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Fsm(#[from] FsmError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Visitor-specific failure
    #[error("{fsm_type} visitor failed on entity {entity_id}: {reason}")]
    Failed {
        fsm_type: FsmType,
        entity_id: EntityId,
        reason: String,
    },
}

impl VisitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VisitError::Timeout { .. } => ErrorKind::Timeout,
            VisitError::Entity(err) => err.kind(),
            VisitError::Curve(err) => err.kind(),
            VisitError::Fsm(err) => err.kind(),
            VisitError::Schedule(err) => err.kind(),
            VisitError::Failed { .. } => ErrorKind::Internal,
        }
    }
}

/// Errors raised while building a visitor list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitorListError {
    /// Two visitors were registered for the same FSM type
    #[error("A visitor with type {fsm_type} has already been registered")]
    Duplicate { fsm_type: FsmType },
}

impl VisitorListError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VisitorListError::Duplicate { .. } => ErrorKind::AlreadyExists,
        }
    }
}
