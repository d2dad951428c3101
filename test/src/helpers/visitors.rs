use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use downflux_shared::{Entity, EntityId, FsmType, InstanceId, InstanceList, Tick, VisitError, Visitor};

/// Shared log of `(visitor type, entity id)` pairs, in visit order.
pub type VisitLog = Arc<Mutex<Vec<(FsmType, EntityId)>>>;

pub fn visit_log() -> VisitLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Records every visit into a shared log, and the instances it was handed
/// at each tick. Never advances an instance.
pub struct RecordingVisitor {
    fsm_type: FsmType,
    log: VisitLog,
    scheduled: Mutex<Vec<(Tick, Vec<InstanceId>)>>,
}

impl RecordingVisitor {
    pub fn new(fsm_type: FsmType, log: &VisitLog) -> Self {
        Self {
            fsm_type,
            log: log.clone(),
            scheduled: Mutex::new(Vec::new()),
        }
    }

    /// `(tick, instance ids)` for every `schedule` call so far.
    pub fn scheduled(&self) -> Vec<(Tick, Vec<InstanceId>)> {
        self.scheduled.lock().unwrap().clone()
    }

    /// Entities visited by this visitor, deduplicated.
    pub fn visited(&self) -> BTreeSet<EntityId> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(fsm_type, _)| *fsm_type == self.fsm_type)
            .map(|(_, id)| id.clone())
            .collect()
    }
}

impl Visitor for RecordingVisitor {
    fn fsm_type(&self) -> FsmType {
        self.fsm_type
    }

    fn schedule(&self, tick: Tick, instances: &InstanceList) -> Result<(), VisitError> {
        let ids = instances.iter().map(|instance| instance.id().clone()).collect();
        self.scheduled.lock().unwrap().push((tick, ids));
        Ok(())
    }

    fn visit(&self, entity: &dyn Entity) -> Result<(), VisitError> {
        self.log
            .lock()
            .unwrap()
            .push((self.fsm_type, entity.id().clone()));
        Ok(())
    }
}

/// Fails on a fixed set of entities and records the rest.
pub struct FailingVisitor {
    fsm_type: FsmType,
    targets: BTreeSet<EntityId>,
    log: VisitLog,
}

impl FailingVisitor {
    pub fn new(fsm_type: FsmType, targets: &[&str], log: &VisitLog) -> Self {
        Self {
            fsm_type,
            targets: targets.iter().map(|id| EntityId::from(*id)).collect(),
            log: log.clone(),
        }
    }
}

impl Visitor for FailingVisitor {
    fn fsm_type(&self) -> FsmType {
        self.fsm_type
    }

    fn visit(&self, entity: &dyn Entity) -> Result<(), VisitError> {
        if self.targets.contains(entity.id()) {
            return Err(VisitError::Failed {
                fsm_type: self.fsm_type,
                entity_id: entity.id().clone(),
                reason: "injected failure".to_string(),
            });
        }
        self.log
            .lock()
            .unwrap()
            .push((self.fsm_type, entity.id().clone()));
        Ok(())
    }
}

/// Sleeps on every visit, to push a pass past its deadline.
pub struct SlowVisitor {
    fsm_type: FsmType,
    delay: Duration,
}

impl SlowVisitor {
    pub fn new(fsm_type: FsmType, delay: Duration) -> Self {
        Self { fsm_type, delay }
    }
}

impl Visitor for SlowVisitor {
    fn fsm_type(&self) -> FsmType {
        self.fsm_type
    }

    fn visit(&self, _entity: &dyn Entity) -> Result<(), VisitError> {
        thread::sleep(self.delay);
        Ok(())
    }
}
