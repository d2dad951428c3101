#[allow(clippy::module_inception)]
mod entity;
mod entity_list;
pub mod error;
mod lifecycle;

pub use entity::Entity;
pub use entity_list::EntityList;
pub use error::EntityError;
pub use lifecycle::Lifecycle;
