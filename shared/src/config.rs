use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
    fsm::{Group, GroupError, GroupList, Schedule},
    ErrorKind, FsmType,
};

/// Errors raised while building or consuming an [`FsmConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Config is locked and cannot be modified
    #[error("FSM config is already locked and cannot be modified. FsmConfig.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// A group names an FSM type that was never registered
    #[error("Conflict group {group} contains unregistered FSM type {fsm_type}")]
    UnregisteredGroupMember { group: String, fsm_type: FsmType },

    #[error(transparent)]
    Group(#[from] GroupError),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::AlreadyLocked | ConfigError::UnregisteredGroupMember { .. } => {
                ErrorKind::FailedPrecondition
            }
            ConfigError::Group(err) => err.kind(),
        }
    }
}

/// Registered FSM types and conflict groups of one simulation instance.
///
/// Every registry (schedules, group lists) is built from this value; there is
/// no process-wide registration.
#[derive(Clone, Debug, Default)]
pub struct FsmConfig {
    /// FSM types accepted by schedules built from this config
    pub fsm_types: BTreeSet<FsmType>,
    /// Mutually exclusive FSM type sets
    pub groups: Vec<Vec<FsmType>>,
    locked: bool,
}

impl FsmConfig {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Move, Chase, Attack and Produce, with the first three mutually
    /// exclusive.
    pub fn standard() -> Self {
        let mut config = Self::builder();
        config
            .add_fsm_type(FsmType::MOVE)
            .add_fsm_type(FsmType::CHASE)
            .add_fsm_type(FsmType::ATTACK)
            .add_fsm_type(FsmType::PRODUCE)
            .add_group([FsmType::MOVE, FsmType::CHASE, FsmType::ATTACK]);
        config.build()
    }

    pub fn add_fsm_type(&mut self, fsm_type: FsmType) -> &mut Self {
        self.check_lock();
        self.fsm_types.insert(fsm_type);
        self
    }

    pub fn add_group(&mut self, fsm_types: impl IntoIterator<Item = FsmType>) -> &mut Self {
        self.check_lock();
        self.groups.push(fsm_types.into_iter().collect());
        self
    }

    // Non-panicking builder methods

    pub fn try_add_fsm_type(&mut self, fsm_type: FsmType) -> Result<&mut Self, ConfigError> {
        self.try_check_lock()?;
        self.fsm_types.insert(fsm_type);
        Ok(self)
    }

    pub fn try_add_group(
        &mut self,
        fsm_types: impl IntoIterator<Item = FsmType>,
    ) -> Result<&mut Self, ConfigError> {
        self.try_check_lock()?;
        self.groups.push(fsm_types.into_iter().collect());
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ConfigError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns Err if the config is locked
    pub fn try_check_lock(&self) -> Result<(), ConfigError> {
        if self.locked {
            Err(ConfigError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Panics if the config is locked
    pub fn check_lock(&self) {
        if self.locked {
            panic!("FsmConfig already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }

    /// A fresh, empty schedule accepting every registered type.
    pub fn build_schedule(&self) -> Schedule {
        Schedule::new(self.fsm_types.iter().copied())
    }

    /// Validates and builds the conflict group list. Groups may only name
    /// registered FSM types.
    pub fn build_groups(&self) -> Result<GroupList, ConfigError> {
        let mut groups = Vec::with_capacity(self.groups.len());
        for members in &self.groups {
            let group = Group::new(members.iter().copied());
            if let Some(fsm_type) = members
                .iter()
                .find(|fsm_type| !self.fsm_types.contains(*fsm_type))
            {
                return Err(ConfigError::UnregisteredGroupMember {
                    group: group.id().to_string(),
                    fsm_type: *fsm_type,
                });
            }
            groups.push(group);
        }
        Ok(GroupList::new(groups)?)
    }
}
