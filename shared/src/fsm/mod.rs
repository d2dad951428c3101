pub mod error;
#[allow(clippy::module_inception)]
mod fsm;
mod group;
mod instance;
mod instance_list;
mod schedule;

pub use error::{FsmError, GroupError, ScheduleError};
pub use fsm::{Fsm, FsmState, Transition};
pub use group::{Group, GroupList};
pub use instance::{Instance, InstanceBase};
pub use instance_list::InstanceList;
pub use schedule::Schedule;
