use std::{
    collections::{hash_map::DefaultHasher, BTreeMap},
    hash::{Hash, Hasher},
    ops::Bound,
};

use crate::{
    curve::{Datum, DatumType, DatumValue},
    ClientId, CurveId, EntityId, Tick,
};

use super::error::CurveError;

/// Interpolation policy of a curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveType {
    /// Holds the value of the latest sample at-or-before the queried tick.
    Step,
    /// Linearly interpolates between neighbouring samples.
    LinearMove,
}

/// Entity attribute described by a curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CurveCategory {
    Position,
    Health,
}

impl CurveCategory {
    pub fn name(&self) -> &'static str {
        match self {
            CurveCategory::Position => "position",
            CurveCategory::Health => "health",
        }
    }

    /// Id shared by every segment of this attribute's curve for `entity_id`.
    pub fn curve_id(&self, entity_id: &EntityId) -> CurveId {
        CurveId::new(format!("{}/{}", entity_id, self.name()))
    }
}

/// The evolution of one entity attribute over ticks.
///
/// Samples are kept ordered by tick. A curve is built once and then treated
/// as immutable: newer segments are combined through [`Curve::merge`] into a
/// fresh curve, never written into an existing one.
///
/// # Boundary policy
///
/// [`Curve::get`] clamps to the nearest sample: a query before the first
/// sample returns the first value, a query after the last sample returns the
/// last value. Querying an empty curve is a `NotFound`-kind error.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve<T: Datum> {
    client_id: ClientId,
    curve_id: CurveId,
    curve_type: CurveType,
    tick: Tick,
    samples: BTreeMap<Tick, T>,
}

impl<T: Datum> Curve<T> {
    /// Creates an empty curve, authoritative as of `tick`.
    pub fn new(client_id: ClientId, curve_id: CurveId, curve_type: CurveType, tick: Tick) -> Self {
        Self {
            client_id,
            curve_id,
            curve_type,
            tick,
            samples: BTreeMap::new(),
        }
    }

    /// Adds a sample while the curve is being built, replacing any sample
    /// already stored at `tick`.
    pub fn add(&mut self, tick: Tick, value: T) {
        self.samples.insert(tick, value);
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn curve_id(&self) -> &CurveId {
        &self.curve_id
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    pub fn datum_type(&self) -> DatumType {
        T::DATUM_TYPE
    }

    /// Last server tick at which the curve was authoritative.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_tick(&self) -> Option<Tick> {
        self.samples.keys().next().copied()
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.samples.keys().next_back().copied()
    }

    /// Samples in tick order.
    pub fn samples(&self) -> impl Iterator<Item = (Tick, &T)> {
        self.samples.iter().map(|(tick, value)| (*tick, value))
    }

    /// Value of the curve at `tick`, see the boundary policy above.
    pub fn get(&self, tick: Tick) -> Result<T, CurveError> {
        let before = self.samples.range(..=tick).next_back();
        let after = self
            .samples
            .range((Bound::Excluded(tick), Bound::Unbounded))
            .next();

        match (before, after) {
            (None, None) => Err(CurveError::Empty {
                curve_id: self.curve_id.clone(),
            }),
            (Some((_, value)), None) | (None, Some((_, value))) => Ok(value.clone()),
            (Some((before_tick, before_value)), Some((after_tick, after_value))) => {
                if *before_tick == tick || self.curve_type == CurveType::Step {
                    return Ok(before_value.clone());
                }
                let ratio = (tick - before_tick) as f64 / (after_tick - before_tick) as f64;
                Ok(before_value.interpolate(after_value, ratio))
            }
        }
    }

    /// Whether every sample of `self` appears in `other` at the same tick with
    /// an identical value.
    pub fn is_subset_of(&self, other: &Curve<T>) -> bool {
        self.samples
            .iter()
            .all(|(tick, value)| other.samples.get(tick) == Some(value))
    }

    /// Content fingerprint covering identity, interpolation type and samples.
    /// Equal curves always share a fingerprint; used to skip re-sending
    /// unchanged curves.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.curve_id.hash(&mut hasher);
        self.curve_type.hash(&mut hasher);
        T::DATUM_TYPE.hash(&mut hasher);
        for (tick, value) in &self.samples {
            tick.hash(&mut hasher);
            value.fingerprint(&mut hasher);
        }
        hasher.finish()
    }

    /// Temporally ordered union of two segments of the same curve.
    ///
    /// Fails with a `Conflict` if both curves hold different values at the
    /// same tick. The merged curve keeps the identity of `self` and the later
    /// of the two authoritative ticks.
    pub fn merge(&self, other: &Curve<T>) -> Result<Curve<T>, CurveError> {
        self.check_compatible(other)?;

        let mut samples = self.samples.clone();
        for (tick, value) in &other.samples {
            match samples.get(tick) {
                Some(existing) if existing != value => {
                    return Err(CurveError::Conflict {
                        curve_id: self.curve_id.clone(),
                        tick: *tick,
                    });
                }
                Some(_) => {}
                None => {
                    samples.insert(*tick, value.clone());
                }
            }
        }

        Ok(Curve {
            client_id: self.client_id.clone(),
            curve_id: self.curve_id.clone(),
            curve_type: self.curve_type,
            tick: self.tick.max(other.tick),
            samples,
        })
    }

    /// A new curve with the same identity holding only the samples in the
    /// inclusive window `[start, end]`.
    pub fn extract(&self, start: Tick, end: Tick) -> Result<Curve<T>, CurveError> {
        if start > end {
            return Err(CurveError::InvalidRange { start, end });
        }

        Ok(self.with_samples(
            self.samples
                .range(start..=end)
                .map(|(tick, value)| (*tick, value.clone()))
                .collect(),
        ))
    }

    /// Samples strictly before `tick`, same identity.
    pub fn head(&self, tick: Tick) -> Curve<T> {
        self.with_samples(
            self.samples
                .range(..tick)
                .map(|(tick, value)| (*tick, value.clone()))
                .collect(),
        )
    }

    /// Samples to replicate to a client that already knows the curve up to
    /// `tick`.
    ///
    /// Includes every sample at or after `tick` plus the one sample
    /// immediately before it, so that the client can interpolate into the
    /// window. If `tick` lies past the end, only the last sample is included.
    pub fn export(&self, tick: Tick) -> CurveSnapshot {
        let mut data: Vec<(Tick, DatumValue)> = Vec::new();

        if let Some((before_tick, before_value)) = self.samples.range(..tick).next_back() {
            data.push((*before_tick, before_value.to_value()));
        }
        data.extend(
            self.samples
                .range(tick..)
                .map(|(tick, value)| (*tick, value.to_value())),
        );

        CurveSnapshot {
            client_id: self.client_id.clone(),
            curve_id: self.curve_id.clone(),
            curve_type: self.curve_type,
            datum_type: T::DATUM_TYPE,
            tick: self.tick,
            data,
        }
    }

    fn check_compatible(&self, other: &Curve<T>) -> Result<(), CurveError> {
        if self.curve_id != other.curve_id {
            return Err(CurveError::IdMismatch {
                expected: self.curve_id.clone(),
                actual: other.curve_id.clone(),
            });
        }
        if self.curve_type != other.curve_type {
            return Err(CurveError::TypeMismatch {
                expected: self.curve_type,
                actual: other.curve_type,
            });
        }
        Ok(())
    }

    fn with_samples(&self, samples: BTreeMap<Tick, T>) -> Curve<T> {
        Curve {
            client_id: self.client_id.clone(),
            curve_id: self.curve_id.clone(),
            curve_type: self.curve_type,
            tick: self.tick,
            samples,
        }
    }
}

/// Wire-ready view of a curve window.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSnapshot {
    pub client_id: ClientId,
    pub curve_id: CurveId,
    pub curve_type: CurveType,
    pub datum_type: DatumType,
    pub tick: Tick,
    pub data: Vec<(Tick, DatumValue)>,
}
