use thiserror::Error;

use crate::{EntityId, ErrorKind, Tick};

/// Errors raised by entities and entity lists
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// A direct child with the same id already exists
    #[error("An entity with id {id} already exists in list {list}")]
    Duplicate { list: EntityId, id: EntityId },

    /// `delete` was already called on this entity
    #[error("Entity was already deleted at tick {end}")]
    AlreadyDeleted { end: Tick },

    /// An entity cannot end before it starts
    #[error("Cannot delete entity at tick {tick}, which precedes its start tick {start}")]
    DeleteBeforeStart { start: Tick, tick: Tick },

    /// Adding the child would make a composite contain one of its ancestors
    #[error("Adding {id} to list {list} would create a cycle")]
    Cycle { list: EntityId, id: EntityId },

    /// Children lock is poisoned
    #[error("Entity list lock is poisoned - a panic occurred while holding it")]
    LockPoisoned,
}

impl EntityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EntityError::Duplicate { .. } => ErrorKind::AlreadyExists,
            EntityError::AlreadyDeleted { .. } => ErrorKind::FailedPrecondition,
            EntityError::DeleteBeforeStart { .. } | EntityError::Cycle { .. } => {
                ErrorKind::InvalidArgument
            }
            EntityError::LockPoisoned => ErrorKind::Internal,
        }
    }
}
