//! # Downflux Shared
//! Simulation primitives of the downflux authoritative server: time-indexed
//! curves, FSM instances and their schedule, conflict groups, the entity
//! tree and visitor dispatch.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

mod config;
mod error;
mod types;

pub mod curve;
pub mod entity;
pub mod fsm;
pub mod visitor;

pub use config::{ConfigError, FsmConfig};
pub use curve::{
    AnyCurve, Coordinate, Curve, CurveCategory, CurveError, CurveSnapshot, CurveStore, CurveType,
    Datum, DatumType, DatumValue, Position,
};
pub use entity::{Entity, EntityError, EntityList, Lifecycle};
pub use error::ErrorKind;
pub use fsm::{
    Fsm, FsmError, FsmState, Group, GroupError, GroupList, Instance, InstanceBase, InstanceList,
    Schedule, ScheduleError, Transition,
};
pub use types::{ClientId, CurveId, EntityId, EntityType, FsmType, GroupId, InstanceId, Tick};
pub use visitor::{
    dispatch, DeadlineVisitor, StageError, VisitError, Visitor, VisitorList, VisitorListError,
};
