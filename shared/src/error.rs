use std::fmt;

/// Coarse classification shared by every error in the simulation core.
///
/// Module errors stay specific (`CurveError`, `ScheduleError`, ...), but each
/// maps onto exactly one kind so that the tick loop and the intake layer can
/// decide how to report a failure without matching on every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed command or curve operands
    InvalidArgument,
    /// An operation was attempted against a registry that does not allow it,
    /// e.g. an unregistered FSM type or conflicting group definitions
    FailedPrecondition,
    /// Duplicate entity id or duplicate visitor type
    AlreadyExists,
    /// Two curves disagree on the value at the same tick
    Conflict,
    /// Pathfinding failure or absent lookup
    NotFound,
    /// Reserved for genuinely unfinished command types
    Unimplemented,
    /// A visitor ran past the tick deadline
    Timeout,
    /// Internal consistency failure, e.g. a poisoned lock
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::FailedPrecondition => "FailedPrecondition",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Unimplemented => "Unimplemented",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Internal => "Internal",
        };
        f.write_str(name)
    }
}
