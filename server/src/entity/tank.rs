use std::any::Any;

use downflux_shared::{
    ClientId, Curve, CurveCategory, CurveError, CurveStore, CurveType, DatumType, Entity,
    EntityId, EntityType, Lifecycle, Position, Tick, VisitError, Visitor,
};

/// Starting health of a freshly spawned tank.
pub const TANK_HEALTH: f64 = 100.0;

/// Moveable leaf entity with a position and a health curve.
pub struct Tank {
    id: EntityId,
    lifecycle: Lifecycle,
    curves: CurveStore,
}

impl Tank {
    /// Spawns a tank at `position` on `tick`, owned by `client_id`.
    pub fn new(
        client_id: ClientId,
        id: EntityId,
        tick: Tick,
        position: Position,
    ) -> Result<Self, CurveError> {
        let mut position_curve = Curve::new(
            client_id.clone(),
            CurveCategory::Position.curve_id(&id),
            CurveType::LinearMove,
            tick,
        );
        position_curve.add(tick, position);

        let mut health_curve = Curve::new(
            client_id,
            CurveCategory::Health.curve_id(&id),
            CurveType::Step,
            tick,
        );
        health_curve.add(tick, TANK_HEALTH);

        let curves = CurveStore::from_curves([
            (CurveCategory::Position, position_curve.into()),
            (CurveCategory::Health, health_curve.into()),
        ])?;

        Ok(Self {
            id,
            lifecycle: Lifecycle::new(tick),
            curves,
        })
    }

    /// Position at `tick`.
    pub fn position(&self, tick: Tick) -> Result<Position, CurveError> {
        let curve = self.curves.get(CurveCategory::Position)?;
        match curve.as_position() {
            Some(curve) => curve.get(tick),
            None => Err(CurveError::DatumMismatch {
                expected: DatumType::Position,
                actual: curve.datum_type(),
            }),
        }
    }
}

impl Entity for Tank {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Tank
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn curves(&self) -> Option<&CurveStore> {
        Some(&self.curves)
    }

    fn accept(&self, visitor: &dyn Visitor) -> Result<(), VisitError> {
        visitor.visit(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
