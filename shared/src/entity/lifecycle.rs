use std::sync::OnceLock;

use crate::{entity::EntityError, Tick};

/// Start and end markers of an entity.
///
/// The end tick is written at most once. A deleted entity stays in the tree
/// and is only considered dead from its end tick onward.
#[derive(Debug, Default)]
pub struct Lifecycle {
    start: Tick,
    end: OnceLock<Tick>,
}

impl Lifecycle {
    pub fn new(start: Tick) -> Self {
        Self {
            start,
            end: OnceLock::new(),
        }
    }

    pub fn start(&self) -> Tick {
        self.start
    }

    /// `None` while the entity is alive.
    pub fn end(&self) -> Option<Tick> {
        self.end.get().copied()
    }

    pub fn delete(&self, tick: Tick) -> Result<(), EntityError> {
        if tick < self.start {
            return Err(EntityError::DeleteBeforeStart {
                start: self.start,
                tick,
            });
        }
        self.end.set(tick).map_err(|_| EntityError::AlreadyDeleted {
            end: self.end().unwrap_or(tick),
        })
    }

    /// Whether the entity exists at `tick`: started, and not yet ended.
    pub fn is_alive(&self, tick: Tick) -> bool {
        tick >= self.start && self.end().map_or(true, |end| tick < end)
    }
}
