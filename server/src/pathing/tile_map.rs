use std::collections::BTreeSet;

use downflux_shared::Coordinate;

use crate::pathing::PathError;

/// Rectangular grid of tiles, some of which are blocked.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: i32,
    height: i32,
    blocked: BTreeSet<Coordinate>,
}

impl TileMap {
    pub fn new(width: i32, height: i32) -> Result<Self, PathError> {
        if width <= 0 || height <= 0 {
            return Err(PathError::InvalidDimensions {
                width,
                height,
                cluster_size: 1,
            });
        }
        Ok(Self {
            width,
            height,
            blocked: BTreeSet::new(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn block(&mut self, coordinate: Coordinate) -> Result<(), PathError> {
        self.check_bounds(coordinate)?;
        self.blocked.insert(coordinate);
        Ok(())
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (0..self.width).contains(&coordinate.x) && (0..self.height).contains(&coordinate.y)
    }

    pub fn is_passable(&self, coordinate: Coordinate) -> bool {
        self.contains(coordinate) && !self.blocked.contains(&coordinate)
    }

    pub fn check_bounds(&self, coordinate: Coordinate) -> Result<(), PathError> {
        if !self.contains(coordinate) {
            return Err(PathError::OutOfBounds {
                coordinate,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Passable 4-neighbours of `coordinate`, in +x, -x, +y, -y order.
    pub fn neighbours(&self, coordinate: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(move |(dx, dy)| Coordinate::new(coordinate.x + dx, coordinate.y + dy))
            .filter(move |next| self.is_passable(*next))
    }

    /// Every passable tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Coordinate::new(x, y)))
            .filter(move |tile| !self.blocked.contains(tile))
    }
}
