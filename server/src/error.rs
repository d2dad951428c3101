use thiserror::Error;

use downflux_shared::{
    ClientId, ConfigError, CurveError, EntityError, EntityId, ErrorKind, ScheduleError,
    VisitorListError,
};

use crate::{command::CommandError, pathing::PathError, status::RunState};

/// Errors raised by the executor and the server runtime
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// Request from a client that never registered
    #[error("Client {client_id} is not registered")]
    UnknownClient { client_id: ClientId },

    /// Command targets an entity that is not in the tree
    #[error("Entity {entity_id} does not exist")]
    UnknownEntity { entity_id: EntityId },

    /// Client ids must be at least one character long
    #[error("Client id length must be positive")]
    InvalidClientIdLength,

    /// No unused client id was found within the retry budget
    #[error("No free client id of length {id_length} after {attempts} attempts")]
    ClientIdsExhausted { id_length: usize, attempts: usize },

    /// Run state change not allowed from the current state
    #[error("Cannot move executor from {from:?} to {to:?}")]
    InvalidRunState { from: RunState, to: RunState },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    VisitorList(#[from] VisitorListError),

    /// Runtime lock is poisoned
    #[error("Executor lock is poisoned - a panic occurred while holding it")]
    LockPoisoned,
}

impl ExecutorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecutorError::UnknownClient { .. } | ExecutorError::UnknownEntity { .. } => {
                ErrorKind::NotFound
            }
            ExecutorError::InvalidClientIdLength => ErrorKind::InvalidArgument,
            ExecutorError::InvalidRunState { .. } | ExecutorError::ClientIdsExhausted { .. } => {
                ErrorKind::FailedPrecondition
            }
            ExecutorError::Command(err) => err.kind(),
            ExecutorError::Path(err) => err.kind(),
            ExecutorError::Schedule(err) => err.kind(),
            ExecutorError::Entity(err) => err.kind(),
            ExecutorError::Curve(err) => err.kind(),
            ExecutorError::Config(err) => err.kind(),
            ExecutorError::VisitorList(err) => err.kind(),
            ExecutorError::LockPoisoned => ErrorKind::Internal,
        }
    }
}
