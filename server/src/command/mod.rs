pub mod error;
mod move_command;
mod report;

pub use error::CommandError;
pub use move_command::{MoveArgs, MoveCommand, DEFAULT_TICKS_PER_TILE};
pub use report::{CommandFailure, CommandFailures};
