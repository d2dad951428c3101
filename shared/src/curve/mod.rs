mod any_curve;
#[allow(clippy::module_inception)]
mod curve;
mod datum;
pub mod error;
mod store;

pub use any_curve::AnyCurve;
pub use curve::{Curve, CurveCategory, CurveSnapshot, CurveType};
pub use datum::{Coordinate, Datum, DatumType, DatumValue, Position};
pub use error::CurveError;
pub use store::CurveStore;
