use std::{collections::BTreeSet, sync::Arc};

use crate::{
    visitor::{Visitor, VisitorListError},
    FsmType,
};

/// Ordered registry of visitors, at most one per FSM type. Registration
/// order is the per-tick application order.
#[derive(Clone, Default)]
pub struct VisitorList {
    visitors: Vec<Arc<dyn Visitor>>,
}

impl VisitorList {
    pub fn new(
        visitors: impl IntoIterator<Item = Arc<dyn Visitor>>,
    ) -> Result<Self, VisitorListError> {
        let mut seen = BTreeSet::new();
        let mut list = Vec::new();
        for visitor in visitors {
            if !seen.insert(visitor.fsm_type()) {
                return Err(VisitorListError::Duplicate {
                    fsm_type: visitor.fsm_type(),
                });
            }
            list.push(visitor);
        }
        Ok(Self { visitors: list })
    }

    pub fn visitor(&self, fsm_type: FsmType) -> Option<&Arc<dyn Visitor>> {
        self.visitors
            .iter()
            .find(|visitor| visitor.fsm_type() == fsm_type)
    }

    /// Visitors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Visitor>> {
        self.visitors.iter()
    }

    pub fn fsm_types(&self) -> impl Iterator<Item = FsmType> + '_ {
        self.visitors.iter().map(|visitor| visitor.fsm_type())
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}
