use std::any::Any;

use crate::{
    curve::CurveStore,
    entity::{EntityError, EntityList, Lifecycle},
    visitor::{VisitError, Visitor},
    EntityId, EntityType, Tick,
};

/// A node of the entity tree.
///
/// Leaves (e.g. a tank) own a curve store; composites own child entities and
/// fan visitors out to them. Capabilities beyond identity and lifecycle are
/// exposed through accessors returning `None` by default, so visitors can
/// skip entities they do not apply to without an error.
pub trait Entity: Any + Send + Sync {
    fn id(&self) -> &EntityId;

    fn entity_type(&self) -> EntityType;

    fn lifecycle(&self) -> &Lifecycle;

    fn start(&self) -> Tick {
        self.lifecycle().start()
    }

    /// `None` while the entity is alive.
    fn end(&self) -> Option<Tick> {
        self.lifecycle().end()
    }

    /// Marks the entity dead from `tick` onward. The entity stays in the tree.
    fn delete(&self, tick: Tick) -> Result<(), EntityError> {
        self.lifecycle().delete(tick)
    }

    fn is_alive(&self, tick: Tick) -> bool {
        self.lifecycle().is_alive(tick)
    }

    /// Per-category curves of a positionable or otherwise curve-backed entity.
    fn curves(&self) -> Option<&CurveStore> {
        None
    }

    /// Direct children of a composite.
    fn children(&self) -> Option<&EntityList> {
        None
    }

    /// Applies `visitor` to this entity, and for composites to every
    /// descendant.
    fn accept(&self, visitor: &dyn Visitor) -> Result<(), VisitError>;

    fn as_any(&self) -> &dyn Any;
}
