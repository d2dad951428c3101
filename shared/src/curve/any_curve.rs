use crate::{
    curve::{Curve, CurveSnapshot, CurveType, DatumType, DatumValue, Position},
    ClientId, CurveId, Tick,
};

use super::error::CurveError;

/// A curve of any supported datum type.
///
/// Entities keep curves of different datum types side by side; operations
/// between two type-erased curves check [`AnyCurve::datum_type`] first and
/// fail with a `DatumMismatch` instead of comparing unrelated data.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyCurve {
    Position(Curve<Position>),
    Float(Curve<f64>),
    Bool(Curve<bool>),
}

macro_rules! delegate {
    ($self:ident, $curve:ident => $body:expr) => {
        match $self {
            AnyCurve::Position($curve) => $body,
            AnyCurve::Float($curve) => $body,
            AnyCurve::Bool($curve) => $body,
        }
    };
}

impl AnyCurve {
    pub fn datum_type(&self) -> DatumType {
        delegate!(self, curve => curve.datum_type())
    }

    pub fn curve_type(&self) -> CurveType {
        delegate!(self, curve => curve.curve_type())
    }

    pub fn client_id(&self) -> &ClientId {
        delegate!(self, curve => curve.client_id())
    }

    pub fn curve_id(&self) -> &CurveId {
        delegate!(self, curve => curve.curve_id())
    }

    pub fn tick(&self) -> Tick {
        delegate!(self, curve => curve.tick())
    }

    pub fn len(&self) -> usize {
        delegate!(self, curve => curve.len())
    }

    pub fn is_empty(&self) -> bool {
        delegate!(self, curve => curve.is_empty())
    }

    pub fn first_tick(&self) -> Option<Tick> {
        delegate!(self, curve => curve.first_tick())
    }

    pub fn get(&self, tick: Tick) -> Result<DatumValue, CurveError> {
        use crate::curve::Datum;
        delegate!(self, curve => curve.get(tick).map(|value| value.to_value()))
    }

    pub fn content_hash(&self) -> u64 {
        delegate!(self, curve => curve.content_hash())
    }

    pub fn export(&self, tick: Tick) -> CurveSnapshot {
        delegate!(self, curve => curve.export(tick))
    }

    pub fn head(&self, tick: Tick) -> AnyCurve {
        match self {
            AnyCurve::Position(curve) => AnyCurve::Position(curve.head(tick)),
            AnyCurve::Float(curve) => AnyCurve::Float(curve.head(tick)),
            AnyCurve::Bool(curve) => AnyCurve::Bool(curve.head(tick)),
        }
    }

    pub fn extract(&self, start: Tick, end: Tick) -> Result<AnyCurve, CurveError> {
        Ok(match self {
            AnyCurve::Position(curve) => AnyCurve::Position(curve.extract(start, end)?),
            AnyCurve::Float(curve) => AnyCurve::Float(curve.extract(start, end)?),
            AnyCurve::Bool(curve) => AnyCurve::Bool(curve.extract(start, end)?),
        })
    }

    pub fn is_subset_of(&self, other: &AnyCurve) -> bool {
        match (self, other) {
            (AnyCurve::Position(a), AnyCurve::Position(b)) => a.is_subset_of(b),
            (AnyCurve::Float(a), AnyCurve::Float(b)) => a.is_subset_of(b),
            (AnyCurve::Bool(a), AnyCurve::Bool(b)) => a.is_subset_of(b),
            _ => self.is_empty(),
        }
    }

    pub fn merge(&self, other: &AnyCurve) -> Result<AnyCurve, CurveError> {
        match (self, other) {
            (AnyCurve::Position(a), AnyCurve::Position(b)) => Ok(AnyCurve::Position(a.merge(b)?)),
            (AnyCurve::Float(a), AnyCurve::Float(b)) => Ok(AnyCurve::Float(a.merge(b)?)),
            (AnyCurve::Bool(a), AnyCurve::Bool(b)) => Ok(AnyCurve::Bool(a.merge(b)?)),
            _ => Err(CurveError::DatumMismatch {
                expected: self.datum_type(),
                actual: other.datum_type(),
            }),
        }
    }

    pub fn as_position(&self) -> Option<&Curve<Position>> {
        match self {
            AnyCurve::Position(curve) => Some(curve),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&Curve<f64>> {
        match self {
            AnyCurve::Float(curve) => Some(curve),
            _ => None,
        }
    }
}

impl From<Curve<Position>> for AnyCurve {
    fn from(curve: Curve<Position>) -> Self {
        AnyCurve::Position(curve)
    }
}

impl From<Curve<f64>> for AnyCurve {
    fn from(curve: Curve<f64>) -> Self {
        AnyCurve::Float(curve)
    }
}

impl From<Curve<bool>> for AnyCurve {
    fn from(curve: Curve<bool>) -> Self {
        AnyCurve::Bool(curve)
    }
}
