use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard},
};

use log::debug;

use crate::{
    fsm::{GroupList, Instance, InstanceList, ScheduleError},
    FsmType,
};

/// Concurrency-safe intake of FSM instances, partitioned by FSM type.
///
/// Request handlers call [`Schedule::add`] from any thread. At the tick
/// boundary the simulation loop calls [`Schedule::pop`], which swaps the
/// accumulated batch out under the same lock: every `add` lands either fully
/// before a pop (and is returned by it) or fully after (and is left for the
/// next one).
pub struct Schedule {
    fsm_types: BTreeSet<FsmType>,
    lists: Mutex<BTreeMap<FsmType, InstanceList>>,
}

impl Schedule {
    /// Creates a schedule accepting exactly the given FSM types.
    pub fn new(fsm_types: impl IntoIterator<Item = FsmType>) -> Self {
        let fsm_types: BTreeSet<FsmType> = fsm_types.into_iter().collect();
        let lists = Self::empty_lists(&fsm_types);
        Self {
            fsm_types,
            lists: Mutex::new(lists),
        }
    }

    pub fn fsm_types(&self) -> impl Iterator<Item = FsmType> + '_ {
        self.fsm_types.iter().copied()
    }

    pub fn accepts(&self, fsm_type: FsmType) -> bool {
        self.fsm_types.contains(&fsm_type)
    }

    /// Routes `instance` into its type's list. Instances of types the
    /// schedule was not built with are rejected and leave every list
    /// untouched.
    pub fn add(&self, instance: Arc<dyn Instance>) -> Result<(), ScheduleError> {
        let fsm_type = instance.fsm_type();
        let mut lists = self.lock()?;

        let Some(list) = lists.get_mut(&fsm_type) else {
            debug!("rejecting {} instance {}: type not registered", fsm_type, instance.id());
            return Err(ScheduleError::UnregisteredType { fsm_type });
        };
        list.add(instance)?;
        Ok(())
    }

    /// Hands the accumulated batch to the caller as a detached schedule and
    /// resets this schedule's lists. The returned value is no longer shared,
    /// so it can be drained without further coordination.
    pub fn pop(&self) -> Result<Schedule, ScheduleError> {
        let mut lists = self.lock()?;
        let fresh = Self::empty_lists(&self.fsm_types);
        let batch = std::mem::replace(&mut *lists, fresh);

        Ok(Schedule {
            fsm_types: self.fsm_types.clone(),
            lists: Mutex::new(batch),
        })
    }

    /// Unions `other` into this schedule, type by type.
    ///
    /// All-or-nothing: every non-empty list of `other` is validated against
    /// this schedule's registered types, and every cancellation the merge
    /// would cause is checked, before anything is committed. A failure
    /// leaves this schedule and the state of every instance unchanged.
    pub fn merge(&self, other: &Schedule) -> Result<(), ScheduleError> {
        if std::ptr::eq(self, other) {
            return Ok(());
        }

        let incoming: Vec<InstanceList> = other
            .lock()?
            .values()
            .filter(|list| !list.is_empty())
            .cloned()
            .collect();

        let mut lists = self.lock()?;
        for list in &incoming {
            let Some(target) = lists.get(&list.fsm_type()) else {
                return Err(ScheduleError::UnregisteredType {
                    fsm_type: list.fsm_type(),
                });
            };
            target.check_merge(list)?;
        }

        let mut staged = lists.clone();
        for list in &incoming {
            if let Some(target) = staged.get_mut(&list.fsm_type()) {
                target.merge(list)?;
            }
        }
        *lists = staged;
        Ok(())
    }

    /// Snapshot of the list for `fsm_type`.
    pub fn get(&self, fsm_type: FsmType) -> Result<InstanceList, ScheduleError> {
        let lists = self.lock()?;
        lists
            .get(&fsm_type)
            .cloned()
            .ok_or(ScheduleError::UnregisteredType { fsm_type })
    }

    /// Drops finished and canceled instances from every list.
    pub fn clear(&self) -> Result<(), ScheduleError> {
        let mut lists = self.lock()?;
        for list in lists.values_mut() {
            list.clear()?;
        }
        Ok(())
    }

    /// Number of queued instances per type.
    pub fn occupancy(&self) -> Result<BTreeMap<FsmType, usize>, ScheduleError> {
        let lists = self.lock()?;
        Ok(lists
            .iter()
            .map(|(fsm_type, list)| (*fsm_type, list.len()))
            .collect())
    }

    pub fn len(&self) -> Result<usize, ScheduleError> {
        Ok(self.occupancy()?.values().sum())
    }

    pub fn is_empty(&self) -> Result<bool, ScheduleError> {
        Ok(self.len()? == 0)
    }

    /// Every instance in type order, then id order.
    pub fn instances(&self) -> Result<Vec<Arc<dyn Instance>>, ScheduleError> {
        let lists = self.lock()?;
        Ok(lists
            .values()
            .flat_map(|list| list.iter().cloned())
            .collect())
    }

    /// Cancels and removes instances of this schedule that are superseded by
    /// instances of `incoming` in the same conflict group.
    ///
    /// Two instances conflict when they act on the same entity, have
    /// different FSM types, and both types belong to one group. The older
    /// instance loses; `incoming` may be this schedule itself to resolve
    /// conflicts inside a single batch. The superseded instances are
    /// returned.
    pub fn resolve_conflicts(
        &self,
        incoming: &Schedule,
        groups: &GroupList,
    ) -> Result<Vec<Arc<dyn Instance>>, ScheduleError> {
        let incoming = incoming.instances()?;
        let mut lists = self.lock()?;
        let mut superseded = Vec::new();

        for instance in &incoming {
            // already superseded earlier in this pass
            if instance.state()?.is_terminal() {
                continue;
            }
            let Some(group) = groups.group_of(instance.fsm_type()) else {
                continue;
            };
            for sibling_type in group.fsm_types() {
                if sibling_type == instance.fsm_type() {
                    continue;
                }
                let Some(list) = lists.get_mut(&sibling_type) else {
                    continue;
                };
                let Some(active) = list.get_by_entity(instance.entity_id()) else {
                    continue;
                };
                if active.tick() > instance.tick() {
                    continue;
                }
                active.cancel()?;
                list.remove(active.id());
                superseded.push(active);
            }
        }

        Ok(superseded)
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<FsmType, InstanceList>>, ScheduleError> {
        self.lists.lock().map_err(|_| ScheduleError::LockPoisoned)
    }

    fn empty_lists(fsm_types: &BTreeSet<FsmType>) -> BTreeMap<FsmType, InstanceList> {
        fsm_types
            .iter()
            .map(|fsm_type| (*fsm_type, InstanceList::new(*fsm_type)))
            .collect()
    }
}
