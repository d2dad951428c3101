mod astar;
pub mod error;
mod graph;
mod tile_map;

pub use astar::{Path, PathFinder, TileAStar};
pub use error::PathError;
pub use graph::AbstractGraph;
pub use tile_map::TileMap;
