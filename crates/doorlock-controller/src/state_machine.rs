//! Session state tracking.
//!
//! [`SessionMachine`] records which phase of an entry cycle the authenticator
//! is in and rejects phase changes that cannot happen on a real lock.
//!
//! # States
//!
//! - `AwaitingEntry`: idle screen shown, no symbol captured yet
//! - `Collecting`: at least one symbol captured
//! - `Evaluating`: entry complete, outcome being shown (unlocking or denied)
//! - `AdminEditing`: administrator changing the user passcode
//!
//! # Valid Transitions
//!
//! - AwaitingEntry → Collecting → Evaluating → AwaitingEntry
//! - Evaluating → AdminEditing → AwaitingEntry
//!
//! # Examples
//!
//! ```
//! use std::time::Instant;
//! use doorlock_controller::{SessionMachine, SessionState};
//!
//! let now = Instant::now();
//! let mut machine = SessionMachine::new(now);
//!
//! machine.transition_to(SessionState::Collecting, now).unwrap();
//! machine.transition_to(SessionState::Evaluating, now).unwrap();
//! assert!(machine.transition_to(SessionState::Collecting, now).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use doorlock_core::{Error, Result};

/// Maximum number of state transitions to keep in history.
///
/// A full cycle records three transitions, so this covers the last thirty
/// or so entries.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Phase of the entry cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Idle screen shown, waiting for the first symbol.
    AwaitingEntry,

    /// Entry partially captured.
    Collecting,

    /// Entry complete, outcome in progress.
    Evaluating,

    /// Passcode change in progress.
    AdminEditing,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SessionState::AwaitingEntry => "AwaitingEntry",
            SessionState::Collecting => "Collecting",
            SessionState::Evaluating => "Evaluating",
            SessionState::AdminEditing => "AdminEditing",
        };
        write!(f, "{}", state_str)
    }
}

impl SessionState {
    /// Check if transition to target state is valid from this state.
    ///
    /// ```
    /// use doorlock_controller::SessionState;
    ///
    /// assert!(SessionState::AwaitingEntry.can_transition_to(&SessionState::Collecting));
    /// assert!(!SessionState::AwaitingEntry.can_transition_to(&SessionState::Evaluating));
    /// ```
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::AwaitingEntry, SessionState::Collecting)
                | (SessionState::Collecting, SessionState::Evaluating)
                | (
                    SessionState::Evaluating,
                    SessionState::AwaitingEntry | SessionState::AdminEditing
                )
                | (SessionState::AdminEditing, SessionState::AwaitingEntry)
        )
    }

    /// Returns `true` while keys feed the entry buffer.
    pub fn accepts_entry(&self) -> bool {
        matches!(self, SessionState::AwaitingEntry | SessionState::Collecting)
    }
}

/// A single state transition with timestamp.
///
/// The timestamp is not serialized, as `Instant` is process-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: SessionState,
    pub to: SessionState,

    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl StateTransition {
    pub fn new(from: SessionState, to: SessionState, timestamp: Instant) -> Self {
        Self {
            from,
            to,
            timestamp,
        }
    }
}

/// Validated session state with a bounded transition history.
///
/// Time is always passed in by the caller, so the machine follows whatever
/// clock drives the controller.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    current_state: SessionState,
    state_entered_at: Instant,
    history: VecDeque<StateTransition>,
}

impl SessionMachine {
    /// Create a machine in `AwaitingEntry`.
    pub fn new(now: Instant) -> Self {
        Self {
            current_state: SessionState::AwaitingEntry,
            state_entered_at: now,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> SessionState {
        self.current_state
    }

    /// Time spent in the current state as of `now`.
    pub fn time_in_current_state(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.state_entered_at)
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Get the last `count` transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        self.history
            .iter()
            .rev()
            .take(count)
            .rev()
            .cloned()
            .collect()
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    /// Returns `Error::InvalidStateTransition` if the transition is not valid
    /// for the current state. The machine is left unchanged.
    pub fn transition_to(
        &mut self,
        new_state: SessionState,
        now: Instant,
    ) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state, now);
        self.perform_state_change(new_state, transition.clone());
        Ok(transition)
    }

    /// Force the machine back to `AwaitingEntry` regardless of current state.
    pub fn reset(&mut self, now: Instant) -> StateTransition {
        let transition = StateTransition::new(self.current_state, SessionState::AwaitingEntry, now);
        self.perform_state_change(SessionState::AwaitingEntry, transition.clone());
        transition
    }

    fn perform_state_change(&mut self, new_state: SessionState, transition: StateTransition) {
        self.current_state = new_state;
        self.state_entered_at = transition.timestamp;

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_machine_awaits_entry() {
        let machine = SessionMachine::new(Instant::now());
        assert_eq!(machine.current_state(), SessionState::AwaitingEntry);
        assert!(machine.history().is_empty());
    }

    #[rstest]
    #[case(SessionState::AwaitingEntry, SessionState::Collecting, true)]
    #[case(SessionState::Collecting, SessionState::Evaluating, true)]
    #[case(SessionState::Evaluating, SessionState::AwaitingEntry, true)]
    #[case(SessionState::Evaluating, SessionState::AdminEditing, true)]
    #[case(SessionState::AdminEditing, SessionState::AwaitingEntry, true)]
    #[case(SessionState::AwaitingEntry, SessionState::Evaluating, false)]
    #[case(SessionState::Collecting, SessionState::AwaitingEntry, false)]
    #[case(SessionState::Collecting, SessionState::AdminEditing, false)]
    #[case(SessionState::AdminEditing, SessionState::Collecting, false)]
    #[case(SessionState::Evaluating, SessionState::Collecting, false)]
    fn test_can_transition_to(
        #[case] from: SessionState,
        #[case] to: SessionState,
        #[case] expected: bool,
    ) {
        assert_eq!(from.can_transition_to(&to), expected);
    }

    #[rstest]
    #[case(SessionState::AwaitingEntry, true)]
    #[case(SessionState::Collecting, true)]
    #[case(SessionState::Evaluating, false)]
    #[case(SessionState::AdminEditing, false)]
    fn test_accepts_entry(#[case] state: SessionState, #[case] expected: bool) {
        assert_eq!(state.accepts_entry(), expected);
    }

    #[test]
    fn test_full_cycle_is_recorded() {
        let start = Instant::now();
        let mut machine = SessionMachine::new(start);

        machine.transition_to(SessionState::Collecting, start).unwrap();
        machine
            .transition_to(SessionState::Evaluating, start + Duration::from_secs(1))
            .unwrap();
        let last = machine
            .transition_to(SessionState::AwaitingEntry, start + Duration::from_secs(4))
            .unwrap();

        assert_eq!(last.from, SessionState::Evaluating);
        assert_eq!(machine.history().len(), 3);
        assert_eq!(
            machine.time_in_current_state(start + Duration::from_secs(5)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_invalid_transition_leaves_state_unchanged() {
        let now = Instant::now();
        let mut machine = SessionMachine::new(now);

        let result = machine.transition_to(SessionState::AdminEditing, now);

        assert!(matches!(result, Err(Error::InvalidStateTransition { .. })));
        assert_eq!(machine.current_state(), SessionState::AwaitingEntry);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_reset_from_any_state() {
        let now = Instant::now();
        let mut machine = SessionMachine::new(now);
        machine.transition_to(SessionState::Collecting, now).unwrap();

        let transition = machine.reset(now);

        assert_eq!(transition.from, SessionState::Collecting);
        assert_eq!(machine.current_state(), SessionState::AwaitingEntry);
    }

    #[test]
    fn test_history_size_limit() {
        let now = Instant::now();
        let mut machine = SessionMachine::new(now);

        for _ in 0..60 {
            machine.transition_to(SessionState::Collecting, now).unwrap();
            machine.transition_to(SessionState::Evaluating, now).unwrap();
            machine.transition_to(SessionState::AwaitingEntry, now).unwrap();
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        let recent = machine.last_transitions(2);
        assert_eq!(recent[0].to, SessionState::Evaluating);
        assert_eq!(recent[1].to, SessionState::AwaitingEntry);
    }

    #[test]
    fn test_state_serializes_snake_case() {
        let json = serde_json::to_string(&SessionState::AdminEditing).unwrap();
        assert_eq!(json, "\"admin_editing\"");
    }
}
