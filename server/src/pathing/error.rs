use thiserror::Error;

use downflux_shared::{Coordinate, ErrorKind};

/// Errors raised by the pathfinding collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Map dimensions or cluster size are not positive
    #[error("Invalid map dimensions {width}x{height} with cluster size {cluster_size}")]
    InvalidDimensions {
        width: i32,
        height: i32,
        cluster_size: i32,
    },

    /// Endpoint lies outside the map
    #[error("Tile {coordinate:?} lies outside the {width}x{height} map")]
    OutOfBounds {
        coordinate: Coordinate,
        width: i32,
        height: i32,
    },

    /// Endpoint is not passable
    #[error("Tile {coordinate:?} is blocked")]
    Blocked { coordinate: Coordinate },

    /// Both endpoints are valid but not connected
    #[error("No path exists from {from:?} to {to:?}")]
    NoPath { from: Coordinate, to: Coordinate },
}

impl PathError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PathError::InvalidDimensions { .. }
            | PathError::OutOfBounds { .. }
            | PathError::Blocked { .. } => ErrorKind::InvalidArgument,
            PathError::NoPath { .. } => ErrorKind::NotFound,
        }
    }
}
