use std::collections::{BTreeMap, VecDeque};

use downflux_shared::Coordinate;
use log::debug;

use crate::pathing::{PathError, TileMap};

/// Coarse abstraction of a [`TileMap`]: the map is cut into square clusters
/// and every passable tile is labeled with its connected region, so that
/// unreachable destinations are rejected without a search.
#[derive(Clone, Debug)]
pub struct AbstractGraph {
    cluster_size: i32,
    regions: BTreeMap<Coordinate, usize>,
    region_count: usize,
}

impl AbstractGraph {
    pub fn build(map: &TileMap, cluster_size: i32) -> Result<Self, PathError> {
        if cluster_size <= 0 {
            return Err(PathError::InvalidDimensions {
                width: map.width(),
                height: map.height(),
                cluster_size,
            });
        }

        let mut regions = BTreeMap::new();
        let mut region_count = 0;
        for tile in map.tiles() {
            if regions.contains_key(&tile) {
                continue;
            }
            let mut frontier = VecDeque::from([tile]);
            regions.insert(tile, region_count);
            while let Some(current) = frontier.pop_front() {
                for next in map.neighbours(current) {
                    if !regions.contains_key(&next) {
                        regions.insert(next, region_count);
                        frontier.push_back(next);
                    }
                }
            }
            region_count += 1;
        }

        debug!(
            "built abstract graph for {}x{} map: {} regions",
            map.width(),
            map.height(),
            region_count
        );
        Ok(Self {
            cluster_size,
            regions,
            region_count,
        })
    }

    pub fn cluster_size(&self) -> i32 {
        self.cluster_size
    }

    /// Cluster containing `coordinate`.
    pub fn cluster(&self, coordinate: Coordinate) -> Coordinate {
        Coordinate::new(
            coordinate.x.div_euclid(self.cluster_size),
            coordinate.y.div_euclid(self.cluster_size),
        )
    }

    /// Connected region label of a passable tile.
    pub fn region(&self, coordinate: Coordinate) -> Option<usize> {
        self.regions.get(&coordinate).copied()
    }

    pub fn region_count(&self) -> usize {
        self.region_count
    }

    pub fn connected(&self, a: Coordinate, b: Coordinate) -> bool {
        match (self.region(a), self.region(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
