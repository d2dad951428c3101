use thiserror::Error;

use downflux_shared::{ErrorKind, FsmType};

use crate::pathing::PathError;

/// Errors raised while executing a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Pathfinding failure, passed through untranslated
    #[error(transparent)]
    Path(#[from] PathError),

    /// No command implementation drives this FSM type
    #[error("Commands of type {fsm_type} are not implemented")]
    Unimplemented { fsm_type: FsmType },
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::Path(err) => err.kind(),
            CommandError::Unimplemented { .. } => ErrorKind::Unimplemented,
        }
    }
}
