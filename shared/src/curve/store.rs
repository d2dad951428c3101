use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use log::debug;

use crate::curve::{AnyCurve, CurveCategory};

use super::error::CurveError;

/// Per-entity mapping from curve category to the entity's current curve.
///
/// Any number of readers (client queries, state export) may read while the
/// tick loop commits new segments. Stored curves are shared immutably;
/// committing swaps in a freshly built curve.
pub struct CurveStore {
    curves: RwLock<BTreeMap<CurveCategory, Arc<AnyCurve>>>,
}

impl CurveStore {
    pub fn new() -> Self {
        Self {
            curves: RwLock::new(BTreeMap::new()),
        }
    }

    /// Builds a store from an initial set of curves. Fails without a partial
    /// store if two curves share a category.
    pub fn from_curves(
        curves: impl IntoIterator<Item = (CurveCategory, AnyCurve)>,
    ) -> Result<Self, CurveError> {
        let mut map = BTreeMap::new();
        for (category, curve) in curves {
            if map.contains_key(&category) {
                return Err(CurveError::DuplicateCategory { category });
            }
            map.insert(category, Arc::new(curve));
        }
        Ok(Self {
            curves: RwLock::new(map),
        })
    }

    pub fn insert(&self, category: CurveCategory, curve: AnyCurve) -> Result<(), CurveError> {
        let mut curves = self.curves.write().map_err(|_| CurveError::LockPoisoned)?;
        if curves.contains_key(&category) {
            return Err(CurveError::DuplicateCategory { category });
        }
        curves.insert(category, Arc::new(curve));
        Ok(())
    }

    pub fn get(&self, category: CurveCategory) -> Result<Arc<AnyCurve>, CurveError> {
        let curves = self.curves.read().map_err(|_| CurveError::LockPoisoned)?;
        curves
            .get(&category)
            .cloned()
            .ok_or(CurveError::MissingCategory { category })
    }

    /// Categories in a stable order.
    pub fn categories(&self) -> Result<Vec<CurveCategory>, CurveError> {
        let curves = self.curves.read().map_err(|_| CurveError::LockPoisoned)?;
        Ok(curves.keys().copied().collect())
    }

    /// Commits a newly resolved segment.
    ///
    /// The stored curve keeps its samples before the segment's first tick;
    /// everything from that tick onward is superseded by the segment. A
    /// segment that is older than the stored curve is ignored and the stored
    /// curve is returned unchanged.
    pub fn commit(
        &self,
        category: CurveCategory,
        segment: AnyCurve,
    ) -> Result<Arc<AnyCurve>, CurveError> {
        let mut curves = self.curves.write().map_err(|_| CurveError::LockPoisoned)?;

        let Some(current) = curves.get(&category) else {
            let segment = Arc::new(segment);
            curves.insert(category, segment.clone());
            return Ok(segment);
        };

        if segment.tick() < current.tick() {
            debug!(
                "ignoring stale {:?} segment for curve {} (segment tick {} < curve tick {})",
                category,
                current.curve_id(),
                segment.tick(),
                current.tick()
            );
            return Ok(current.clone());
        }

        let Some(start) = segment.first_tick() else {
            return Ok(current.clone());
        };

        let merged = Arc::new(current.head(start).merge(&segment)?);
        curves.insert(category, merged.clone());
        Ok(merged)
    }
}

impl Default for CurveStore {
    fn default() -> Self {
        Self::new()
    }
}
