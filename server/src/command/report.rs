use std::sync::Mutex;

use downflux_shared::{ClientId, EntityId, FsmType, InstanceId, Tick};

use crate::{command::CommandError, error::ExecutorError};

/// A command that failed during a tick, to be reported to its client.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandFailure {
    pub tick: Tick,
    pub client_id: ClientId,
    pub entity_id: EntityId,
    pub instance_id: InstanceId,
    pub fsm_type: FsmType,
    pub error: CommandError,
}

/// Failures collected by visitors during a tick and drained by the executor.
#[derive(Debug, Default)]
pub struct CommandFailures {
    failures: Mutex<Vec<CommandFailure>>,
}

impl CommandFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, failure: CommandFailure) -> Result<(), ExecutorError> {
        let mut failures = self.failures.lock().map_err(|_| ExecutorError::LockPoisoned)?;
        failures.push(failure);
        Ok(())
    }

    pub fn drain(&self) -> Result<Vec<CommandFailure>, ExecutorError> {
        let mut failures = self.failures.lock().map_err(|_| ExecutorError::LockPoisoned)?;
        Ok(std::mem::take(&mut *failures))
    }
}
