use std::sync::Arc;

use downflux_shared::{ClientId, Curve, CurveCategory, CurveType, EntityId, Position, Tick};

use crate::{
    command::CommandError,
    pathing::{AbstractGraph, PathFinder, TileMap},
};

/// Ticks spent crossing one tile when no other cost is configured.
pub const DEFAULT_TICKS_PER_TILE: Tick = 10;

/// Per-execution inputs of a [`MoveCommand`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveArgs {
    pub tick: Tick,
    pub source: Position,
}

/// Order to move one entity to a destination tile.
///
/// Executing the command resolves a path and turns it into a position
/// curve. The same inputs always produce the same curve.
#[derive(Clone)]
pub struct MoveCommand {
    path_finder: Arc<dyn PathFinder>,
    map: Arc<TileMap>,
    graph: Arc<AbstractGraph>,
    client_id: ClientId,
    entity_id: EntityId,
    destination: Position,
    ticks_per_tile: Tick,
    lookahead: usize,
}

impl MoveCommand {
    pub fn new(
        path_finder: Arc<dyn PathFinder>,
        map: Arc<TileMap>,
        graph: Arc<AbstractGraph>,
        client_id: ClientId,
        entity_id: EntityId,
        destination: Position,
    ) -> Self {
        Self {
            path_finder,
            map,
            graph,
            client_id,
            entity_id,
            destination,
            ticks_per_tile: DEFAULT_TICKS_PER_TILE,
            lookahead: 0,
        }
    }

    pub fn with_ticks_per_tile(mut self, ticks_per_tile: Tick) -> Self {
        self.ticks_per_tile = ticks_per_tile;
        self
    }

    /// Caps the resolved path at `lookahead` tiles; 0 resolves the full path.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    /// Resolves the path from the tile containing `args.source` and returns a
    /// linear motion curve seeded with `args.source` at `args.tick`.
    ///
    /// Each path tile is reached `ticks_per_tile` ticks per unit of distance
    /// after the previous sample, and never in the same tick. A source that
    /// lies exactly on its tile yields one sample per tile spaced
    /// `ticks_per_tile` apart. Pathfinding errors are returned as is.
    pub fn execute(&self, args: MoveArgs) -> Result<Curve<Position>, CommandError> {
        let path = self.path_finder.find_path(
            &self.map,
            &self.graph,
            args.source.coordinate(),
            self.destination.coordinate(),
            self.lookahead,
        )?;

        let mut curve = Curve::new(
            self.client_id.clone(),
            CurveCategory::Position.curve_id(&self.entity_id),
            CurveType::LinearMove,
            args.tick,
        );
        // the seed keeps the stored trajectory continuous at `args.tick`
        curve.add(args.tick, args.source);
        let mut tick = args.tick;
        let mut previous = args.source;
        for tile in path.tiles {
            let next = Position::from(tile);
            let distance = previous.distance(&next);
            if distance == 0.0 {
                continue;
            }
            let ticks = (self.ticks_per_tile as f64 * distance).round().max(1.0);
            tick += ticks as Tick;
            curve.add(tick, next);
            previous = next;
        }
        Ok(curve)
    }
}
