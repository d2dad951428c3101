use std::time::Instant;

use log::warn;
use thiserror::Error;

use crate::{
    entity::Entity,
    fsm::{InstanceList, Schedule, ScheduleError},
    visitor::{DeadlineVisitor, VisitError, Visitor, VisitorList},
    FsmType, Tick,
};

/// A visitor pass that failed on at least one entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{fsm_type} visitor pass failed: {error}")]
pub struct StageError {
    pub fsm_type: FsmType,
    pub error: VisitError,
}

/// Applies every visitor to the whole tree rooted at `root`, one stage per
/// visitor in registration order. A stage completes across the entire tree
/// before the next one starts.
///
/// Each visitor first receives the instances of its type from `schedule`
/// (an empty list if the schedule does not track the type). A failing stage
/// is reported and does not stop later stages.
pub fn dispatch(
    tick: Tick,
    root: &dyn Entity,
    visitors: &VisitorList,
    schedule: &Schedule,
    deadline: Option<Instant>,
) -> Vec<StageError> {
    let mut failures = Vec::new();

    for visitor in visitors.iter() {
        let fsm_type = visitor.fsm_type();
        if let Err(error) = run_stage(tick, root, visitor.as_ref(), schedule, deadline) {
            warn!("tick {}: {} visitor pass failed: {}", tick, fsm_type, error);
            failures.push(StageError { fsm_type, error });
        }
    }

    failures
}

fn run_stage(
    tick: Tick,
    root: &dyn Entity,
    visitor: &dyn Visitor,
    schedule: &Schedule,
    deadline: Option<Instant>,
) -> Result<(), VisitError> {
    let instances = match schedule.get(visitor.fsm_type()) {
        Ok(list) => list,
        Err(ScheduleError::UnregisteredType { fsm_type }) => InstanceList::new(fsm_type),
        Err(err) => return Err(err.into()),
    };
    visitor.schedule(tick, &instances)?;

    match deadline {
        Some(deadline) => root.accept(&DeadlineVisitor::new(visitor, deadline)),
        None => root.accept(visitor),
    }
}
