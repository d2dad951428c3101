use std::sync::Arc;

use downflux_server::pathing::{AbstractGraph, TileMap};
use downflux_shared::Coordinate;

/// Open `width` x `height` grid.
pub fn open_grid(width: i32, height: i32) -> TileMap {
    walled_grid(width, height, &[])
}

/// Grid with the given tiles blocked.
pub fn walled_grid(width: i32, height: i32, walls: &[(i32, i32)]) -> TileMap {
    let mut map = TileMap::new(width, height).unwrap();
    for (x, y) in walls {
        map.block(Coordinate::new(*x, *y)).unwrap();
    }
    map
}

/// Map and abstract graph, shared the way commands hold them.
pub fn pathing(map: TileMap) -> (Arc<TileMap>, Arc<AbstractGraph>) {
    let graph = AbstractGraph::build(&map, 2).unwrap();
    (Arc::new(map), Arc::new(graph))
}
