use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
};

/// Semantic tag of the values stored in a curve. Used to validate
/// cross-curve operations on type-erased curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatumType {
    Position,
    Float,
    Bool,
}

/// A value that can be stored in a curve.
pub trait Datum: Clone + PartialEq + Debug + Send + Sync + 'static {
    const DATUM_TYPE: DatumType;

    /// Value between `self` and `next`, `ratio` in `[0, 1]`. Data that cannot
    /// be interpolated hold the earlier value.
    fn interpolate(&self, _next: &Self, _ratio: f64) -> Self {
        self.clone()
    }

    /// Feeds a bit-exact representation of the value into `state`.
    fn fingerprint<H: Hasher>(&self, state: &mut H);

    fn to_value(&self) -> DatumValue;
}

/// Continuous world position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The tile containing this position.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<Coordinate> for Position {
    fn from(coordinate: Coordinate) -> Self {
        Self::new(f64::from(coordinate.x), f64::from(coordinate.y))
    }
}

impl Datum for Position {
    const DATUM_TYPE: DatumType = DatumType::Position;

    fn interpolate(&self, next: &Self, ratio: f64) -> Self {
        Position {
            x: self.x + (next.x - self.x) * ratio,
            y: self.y + (next.y - self.y) * ratio,
        }
    }

    fn fingerprint<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
    }

    fn to_value(&self) -> DatumValue {
        DatumValue::Position(*self)
    }
}

impl Datum for f64 {
    const DATUM_TYPE: DatumType = DatumType::Float;

    fn interpolate(&self, next: &Self, ratio: f64) -> Self {
        self + (next - self) * ratio
    }

    fn fingerprint<H: Hasher>(&self, state: &mut H) {
        canonical_bits(*self).hash(state);
    }

    fn to_value(&self) -> DatumValue {
        DatumValue::Float(*self)
    }
}

impl Datum for bool {
    const DATUM_TYPE: DatumType = DatumType::Bool;

    fn fingerprint<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }

    fn to_value(&self) -> DatumValue {
        DatumValue::Bool(*self)
    }
}

/// Discrete map tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Type-erased datum, as exported for replication.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DatumValue {
    Position(Position),
    Float(f64),
    Bool(bool),
}

impl DatumValue {
    pub fn datum_type(&self) -> DatumType {
        match self {
            DatumValue::Position(_) => DatumType::Position,
            DatumValue::Float(_) => DatumType::Float,
            DatumValue::Bool(_) => DatumType::Bool,
        }
    }
}

// -0.0 and +0.0 compare equal, so they must fingerprint equal too
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}
