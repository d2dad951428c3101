use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
};

use downflux_shared::Coordinate;

use crate::pathing::{AbstractGraph, PathError, TileMap};

/// Ordered tile sequence from source to destination, both included.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub tiles: Vec<Coordinate>,
    pub cost: f64,
}

/// Pathfinding collaborator.
///
/// Implementations must be safe to call concurrently against the same map
/// and graph, which are treated as read-only.
pub trait PathFinder: Send + Sync {
    /// Finds a path from `source` to `destination`. A non-zero `lookahead`
    /// truncates the returned path to at most that many tiles.
    fn find_path(
        &self,
        map: &TileMap,
        graph: &AbstractGraph,
        source: Coordinate,
        destination: Coordinate,
        lookahead: usize,
    ) -> Result<Path, PathError>;
}

/// Deterministic 4-neighbour A* over tiles with a Manhattan heuristic.
///
/// Ties on estimated cost are broken by lower heuristic, then by lower
/// coordinate (x first), so the same query always yields the same path.
#[derive(Clone, Copy, Debug, Default)]
pub struct TileAStar;

impl TileAStar {
    fn heuristic(a: Coordinate, b: Coordinate) -> u64 {
        u64::from(a.x.abs_diff(b.x)) + u64::from(a.y.abs_diff(b.y))
    }
}

impl PathFinder for TileAStar {
    fn find_path(
        &self,
        map: &TileMap,
        graph: &AbstractGraph,
        source: Coordinate,
        destination: Coordinate,
        lookahead: usize,
    ) -> Result<Path, PathError> {
        for endpoint in [source, destination] {
            map.check_bounds(endpoint)?;
            if !map.is_passable(endpoint) {
                return Err(PathError::Blocked {
                    coordinate: endpoint,
                });
            }
        }
        if !graph.connected(source, destination) {
            return Err(PathError::NoPath {
                from: source,
                to: destination,
            });
        }

        let mut open = BinaryHeap::new();
        let mut costs: BTreeMap<Coordinate, u64> = BTreeMap::new();
        let mut came_from: BTreeMap<Coordinate, Coordinate> = BTreeMap::new();

        let h = Self::heuristic(source, destination);
        open.push(Reverse((h, h, source)));
        costs.insert(source, 0);

        while let Some(Reverse((estimate, _, current))) = open.pop() {
            let Some(&cost) = costs.get(&current) else {
                continue;
            };
            // stale heap entry
            if estimate > cost + Self::heuristic(current, destination) {
                continue;
            }

            if current == destination {
                let mut tiles = vec![current];
                let mut cursor = current;
                while let Some(&previous) = came_from.get(&cursor) {
                    tiles.push(previous);
                    cursor = previous;
                }
                tiles.reverse();
                if lookahead > 0 {
                    tiles.truncate(lookahead);
                }
                let cost = tiles.len().saturating_sub(1) as f64;
                return Ok(Path { tiles, cost });
            }

            for next in map.neighbours(current) {
                let tentative = cost + 1;
                if costs.get(&next).map_or(true, |known| tentative < *known) {
                    costs.insert(next, tentative);
                    came_from.insert(next, current);
                    let h = Self::heuristic(next, destination);
                    open.push(Reverse((tentative + h, h, next)));
                }
            }
        }

        Err(PathError::NoPath {
            from: source,
            to: destination,
        })
    }
}
