use std::time::Duration;

use downflux_shared::{FsmConfig, Tick};

use crate::command::DEFAULT_TICKS_PER_TILE;

/// Contains Config properties which will be used by the Executor
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// The duration between each tick
    pub tick_interval: Duration,
    /// How long visitor passes may run after a tick starts; `None` disables
    /// the deadline
    pub visit_deadline: Option<Duration>,
    /// Ticks spent by a Move curve crossing one tile
    pub ticks_per_tile: Tick,
    /// Maximum number of path tiles resolved per Move execution, 0 for the
    /// full path
    pub path_lookahead: usize,
    /// Cluster size of the abstract pathing graph
    pub cluster_size: i32,
    /// Length of generated client ids
    pub client_id_length: usize,
    /// How many ticks of curve history the per-tick delta reaches back
    pub export_window: Tick,
    /// Registered FSM types and conflict groups
    pub fsm: FsmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let tick_interval = Duration::from_millis(100);
        Self {
            tick_interval,
            visit_deadline: Some(tick_interval),
            ticks_per_tile: DEFAULT_TICKS_PER_TILE,
            path_lookahead: 0,
            cluster_size: 10,
            client_id_length: 8,
            export_window: 100,
            fsm: FsmConfig::standard(),
        }
    }
}
