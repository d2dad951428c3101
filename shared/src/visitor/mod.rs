mod dispatch;
pub mod error;
mod list;
#[allow(clippy::module_inception)]
mod visitor;

pub use dispatch::{dispatch, StageError};
pub use error::{VisitError, VisitorListError};
pub use list::VisitorList;
pub use visitor::{DeadlineVisitor, Visitor};
