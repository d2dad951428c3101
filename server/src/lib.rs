//! # Downflux Server
//! The authoritative tick loop: accepts client commands into a schedule,
//! resolves conflicting orders, drives FSM instances through visitor passes
//! over the entity tree and exports the resulting curves for replication.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod pathing;
pub mod shared {
    pub use downflux_shared::{
        ClientId, Coordinate, Curve, CurveCategory, CurveSnapshot, CurveType, Entity, EntityId,
        EntityList, ErrorKind, FsmConfig, FsmState, FsmType, Instance, Position, Tick,
    };
}

mod client_list;
mod command;
mod config;
mod dirty;
mod entity;
mod error;
mod executor;
mod fsm;
mod game_state;
mod status;
mod visitor;

pub use client_list::ClientList;
pub use command::{
    CommandError, CommandFailure, CommandFailures, MoveArgs, MoveCommand, DEFAULT_TICKS_PER_TILE,
};
pub use config::ServerConfig;
pub use dirty::{Dirty, DirtyList};
pub use entity::{Tank, TANK_HEALTH};
pub use error::ExecutorError;
pub use executor::{Executor, Runtime, TickReport};
pub use fsm::MoveInstance;
pub use game_state::{EntitySnapshot, GameState, StateSnapshot};
pub use status::{RunState, Status};
pub use visitor::MoveVisitor;
