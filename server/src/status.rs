use std::{
    sync::{
        atomic::{AtomicU64, AtomicU8, Ordering},
        OnceLock,
    },
    time::{Duration, Instant},
};

use downflux_shared::Tick;

use crate::error::ExecutorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Stopped,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => RunState::NotStarted,
            1 => RunState::Running,
            _ => RunState::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            RunState::NotStarted => 0,
            RunState::Running => 1,
            RunState::Stopped => 2,
        }
    }
}

/// Shared, lock-free view of the simulation clock.
#[derive(Debug)]
pub struct Status {
    tick: AtomicU64,
    run_state: AtomicU8,
    start_time: OnceLock<Instant>,
    tick_duration: Duration,
}

impl Status {
    pub fn new(tick_duration: Duration) -> Self {
        Self {
            tick: AtomicU64::new(0),
            run_state: AtomicU8::new(RunState::NotStarted.as_u8()),
            start_time: OnceLock::new(),
            tick_duration,
        }
    }

    pub fn tick(&self) -> Tick {
        self.tick.load(Ordering::Acquire)
    }

    /// Advances the clock and returns the new tick.
    pub fn increment_tick(&self) -> Tick {
        self.tick.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub fn run_state(&self) -> RunState {
        RunState::from_u8(self.run_state.load(Ordering::Acquire))
    }

    pub fn is_stopped(&self) -> bool {
        self.run_state() == RunState::Stopped
    }

    pub fn start_time(&self) -> Option<Instant> {
        self.start_time.get().copied()
    }

    /// NotStarted -> Running. Records the start time.
    pub fn set_started(&self) -> Result<Instant, ExecutorError> {
        self.swap_state(RunState::NotStarted, RunState::Running)?;
        Ok(*self.start_time.get_or_init(Instant::now))
    }

    /// Running -> Stopped.
    pub fn set_stopped(&self) -> Result<(), ExecutorError> {
        self.swap_state(RunState::Running, RunState::Stopped)
    }

    fn swap_state(&self, from: RunState, to: RunState) -> Result<(), ExecutorError> {
        self.run_state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|current| ExecutorError::InvalidRunState {
                from: RunState::from_u8(current),
                to,
            })
    }
}
