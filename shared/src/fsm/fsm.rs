use crate::FsmType;

/// State shared by every FSM instance lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FsmState {
    Pending,
    Executing,
    Finished,
    Canceled,
}

impl FsmState {
    /// Finished and canceled instances are dropped from instance lists.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FsmState::Finished | FsmState::Canceled)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: FsmState,
    pub to: FsmState,
    /// Edge can be probed but never taken
    pub virtual_only: bool,
}

impl Transition {
    pub const fn new(from: FsmState, to: FsmState) -> Self {
        Self {
            from,
            to,
            virtual_only: false,
        }
    }

    pub const fn virtual_only(from: FsmState, to: FsmState) -> Self {
        Self {
            from,
            to,
            virtual_only: true,
        }
    }
}

const COMMON_TRANSITIONS: [Transition; 6] = [
    Transition::new(FsmState::Pending, FsmState::Executing),
    Transition::new(FsmState::Pending, FsmState::Finished),
    Transition::new(FsmState::Pending, FsmState::Canceled),
    Transition::new(FsmState::Executing, FsmState::Executing),
    Transition::new(FsmState::Executing, FsmState::Finished),
    Transition::new(FsmState::Executing, FsmState::Canceled),
];

/// Transition table of one FSM type.
#[derive(Clone, Debug)]
pub struct Fsm {
    fsm_type: FsmType,
    transitions: Vec<Transition>,
}

impl Fsm {
    pub fn new(fsm_type: FsmType, transitions: Vec<Transition>) -> Self {
        Self {
            fsm_type,
            transitions,
        }
    }

    /// Pending -> Executing -> {Finished, Canceled}, with Executing allowed
    /// to re-enter itself across ticks.
    pub fn common(fsm_type: FsmType) -> Self {
        Self::new(fsm_type, COMMON_TRANSITIONS.to_vec())
    }

    pub fn fsm_type(&self) -> FsmType {
        self.fsm_type
    }

    /// Returns `Some(virtual_only)` if an edge exists.
    pub fn edge(&self, from: FsmState, to: FsmState) -> Option<bool> {
        self.transitions
            .iter()
            .find(|transition| transition.from == from && transition.to == to)
            .map(|transition| transition.virtual_only)
    }
}
