use thiserror::Error;

use crate::{
    curve::{CurveCategory, CurveType, DatumType},
    CurveId, ErrorKind, Tick,
};

/// Errors that can occur while reading, combining or storing curves
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// Both curves define different values at the same tick
    #[error("Curve {curve_id} has conflicting values at tick {tick}")]
    Conflict { curve_id: CurveId, tick: Tick },

    /// Extraction window is inverted
    #[error("Invalid curve range [{start}, {end}]: start is after end")]
    InvalidRange { start: Tick, end: Tick },

    /// Curves with different identities cannot be merged
    #[error("Cannot combine curve {expected} with curve {actual}")]
    IdMismatch { expected: CurveId, actual: CurveId },

    /// Curves with different interpolation types cannot be merged
    #[error("Cannot combine {expected:?} curve with {actual:?} curve")]
    TypeMismatch {
        expected: CurveType,
        actual: CurveType,
    },

    /// Type-erased curves hold different datum types
    #[error("Cannot combine curve of {expected:?} data with curve of {actual:?} data")]
    DatumMismatch {
        expected: DatumType,
        actual: DatumType,
    },

    /// Queried a curve with no samples
    #[error("Curve {curve_id} has no samples")]
    Empty { curve_id: CurveId },

    /// Curve store has no curve for the category
    #[error("No {category:?} curve in store")]
    MissingCategory { category: CurveCategory },

    /// Curve store already tracks a curve for the category
    #[error("A {category:?} curve is already in store")]
    DuplicateCategory { category: CurveCategory },

    /// Curve store lock is poisoned
    #[error("Curve store lock is poisoned - a writer panicked while holding it")]
    LockPoisoned,
}

impl CurveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CurveError::Conflict { .. } => ErrorKind::Conflict,
            CurveError::InvalidRange { .. }
            | CurveError::IdMismatch { .. }
            | CurveError::TypeMismatch { .. }
            | CurveError::DatumMismatch { .. } => ErrorKind::InvalidArgument,
            CurveError::Empty { .. } | CurveError::MissingCategory { .. } => ErrorKind::NotFound,
            CurveError::DuplicateCategory { .. } => ErrorKind::AlreadyExists,
            CurveError::LockPoisoned => ErrorKind::Internal,
        }
    }
}
