//! Security state machine.
//!
//! This module tracks the security mode of the controller and applies the
//! two kinds of events that change it: completed keypad entries and motion
//! alarms.
//!
//! # States
//!
//! - `Armed`: motion is watched (initial state)
//! - `Disarmed`: motion is ignored
//! - `Alarm`: sustained motion was seen while armed
//!
//! # Transitions
//!
//! - disarm code: any mode → `Disarmed`
//! - arm code: any mode → `Armed`
//! - stop-alarm code: any mode → `Armed`
//! - motion alarm: `Armed` → `Alarm` (ignored in any other mode)
//!
//! An entry that matches no code changes nothing.
//!
//! # Examples
//!
//! ```
//! use genjen_controller::{SecurityStateMachine, TransitionCause};
//! use genjen_core::{CodeTable, Entry, SecurityMode};
//!
//! let mut machine = SecurityStateMachine::new(CodeTable::default());
//! assert_eq!(machine.mode(), SecurityMode::Armed);
//!
//! let transition = machine.apply_entry(&Entry::new("123").unwrap()).unwrap();
//! assert_eq!(transition.to, SecurityMode::Disarmed);
//! assert_eq!(transition.cause, TransitionCause::Keypad);
//!
//! // Unknown codes are ignored
//! assert!(machine.apply_entry(&Entry::new("999").unwrap()).is_none());
//! assert_eq!(machine.mode(), SecurityMode::Disarmed);
//! ```
//!
//! # Builder Pattern
//!
//! ```
//! use genjen_controller::SecurityStateMachine;
//! use genjen_core::SecurityMode;
//!
//! let mut machine = SecurityStateMachine::builder()
//!     .with_initial_mode(SecurityMode::Disarmed)
//!     .build();
//!
//! // Motion never raises the alarm unless armed
//! assert!(machine.trigger_alarm().is_none());
//! ```

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};
use genjen_core::constants::MAX_HISTORY_SIZE;
use genjen_core::{CodeTable, Entry, SecurityMode};
use serde::{Deserialize, Serialize};

/// What caused a mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// A completed keypad entry matched a secret code.
    Keypad,

    /// The motion accumulator reached its threshold.
    Motion,
}

impl fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionCause::Keypad => write!(f, "keypad"),
            TransitionCause::Motion => write!(f, "motion"),
        }
    }
}

/// A single mode transition with wall-clock timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTransition {
    /// The mode transitioned from.
    pub from: SecurityMode,

    /// The mode transitioned to.
    pub to: SecurityMode,

    /// What triggered the transition.
    pub cause: TransitionCause,

    /// When the transition occurred.
    pub at: DateTime<Local>,
}

impl ModeTransition {
    pub fn new(from: SecurityMode, to: SecurityMode, cause: TransitionCause) -> Self {
        Self {
            from,
            to,
            cause,
            at: Local::now(),
        }
    }

    /// Returns `true` if the mode actually changed.
    ///
    /// A matched code always produces a transition, even when the system
    /// is already in the code's target mode.
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

/// State machine for the security mode.
///
/// # Thread Safety
///
/// This struct is not synchronized. The controller task owns it
/// exclusively; other tasks observe the mode through the
/// [`StateStore`](crate::StateStore).
#[derive(Debug)]
pub struct SecurityStateMachine {
    /// Current security mode.
    mode: SecurityMode,

    /// Secret codes and the mode each one selects.
    codes: CodeTable,

    /// Recent transitions, oldest first (limited to MAX_HISTORY_SIZE).
    history: VecDeque<ModeTransition>,
}

impl SecurityStateMachine {
    /// Create a new state machine in the `Armed` mode.
    pub fn new(codes: CodeTable) -> Self {
        Self {
            mode: SecurityMode::Armed,
            codes,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Create a builder for constructing a state machine with custom configuration.
    pub fn builder() -> SecurityStateMachineBuilder {
        SecurityStateMachineBuilder::default()
    }

    /// Get the current mode.
    pub fn mode(&self) -> SecurityMode {
        self.mode
    }

    /// Get a reference to the transition history, ordered oldest to newest.
    pub fn history(&self) -> &VecDeque<ModeTransition> {
        &self.history
    }

    /// Get the last `count` transitions, ordered oldest to newest.
    pub fn last_transitions(&self, count: usize) -> Vec<ModeTransition> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Apply a completed keypad entry.
    ///
    /// If the entry matches a secret code, the machine moves to that
    /// code's target mode regardless of the current mode, and the
    /// transition is returned. Otherwise nothing happens and `None` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use genjen_controller::SecurityStateMachine;
    /// use genjen_core::{CodeTable, Entry, SecurityMode};
    ///
    /// let mut machine = SecurityStateMachine::builder()
    ///     .with_initial_mode(SecurityMode::Alarm)
    ///     .build();
    ///
    /// machine.apply_entry(&Entry::new("0").unwrap());
    /// assert_eq!(machine.mode(), SecurityMode::Armed);
    /// ```
    pub fn apply_entry(&mut self, entry: &Entry) -> Option<ModeTransition> {
        let target = self.codes.lookup(entry)?;
        Some(self.perform_transition(target, TransitionCause::Keypad))
    }

    /// Raise the alarm after sustained motion.
    ///
    /// Only `Armed` moves to `Alarm`. In any other mode the request is
    /// ignored and `None` is returned.
    pub fn trigger_alarm(&mut self) -> Option<ModeTransition> {
        if !self.mode.is_armed() {
            return None;
        }
        Some(self.perform_transition(SecurityMode::Alarm, TransitionCause::Motion))
    }

    fn perform_transition(&mut self, to: SecurityMode, cause: TransitionCause) -> ModeTransition {
        let transition = ModeTransition::new(self.mode, to, cause);
        self.mode = to;

        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        transition
    }
}

impl Default for SecurityStateMachine {
    fn default() -> Self {
        Self::new(CodeTable::default())
    }
}

/// Builder for `SecurityStateMachine` instances.
///
/// # Examples
///
/// ```
/// use genjen_controller::SecurityStateMachine;
/// use genjen_core::{CodeTable, SecretCode, SecurityMode};
///
/// let codes = CodeTable::new(
///     SecretCode::new("4711").unwrap(),
///     SecretCode::new("1").unwrap(),
///     SecretCode::new("2").unwrap(),
/// );
///
/// let machine = SecurityStateMachine::builder()
///     .with_codes(codes)
///     .with_initial_mode(SecurityMode::Disarmed)
///     .build();
///
/// assert_eq!(machine.mode(), SecurityMode::Disarmed);
/// ```
#[derive(Debug, Default)]
pub struct SecurityStateMachineBuilder {
    initial_mode: Option<SecurityMode>,
    codes: Option<CodeTable>,
    history: VecDeque<ModeTransition>,
}

impl SecurityStateMachineBuilder {
    pub fn with_initial_mode(mut self, mode: SecurityMode) -> Self {
        self.initial_mode = Some(mode);
        self
    }

    pub fn with_codes(mut self, codes: CodeTable) -> Self {
        self.codes = Some(codes);
        self
    }

    /// Pre-populate the history. Only the newest entries that fit are kept.
    pub fn with_history(mut self, history: VecDeque<ModeTransition>) -> Self {
        self.history = history;
        self
    }

    pub fn build(mut self) -> SecurityStateMachine {
        while self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        SecurityStateMachine {
            mode: self.initial_mode.unwrap_or(SecurityMode::Armed),
            codes: self.codes.unwrap_or_default(),
            history: self.history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(digits: &str) -> Entry {
        Entry::new(digits).unwrap()
    }

    fn machine_in(mode: SecurityMode) -> SecurityStateMachine {
        SecurityStateMachine::builder()
            .with_initial_mode(mode)
            .build()
    }

    #[test]
    fn test_new_machine_starts_armed() {
        let machine = SecurityStateMachine::default();
        assert_eq!(machine.mode(), SecurityMode::Armed);
        assert!(machine.history().is_empty());
    }

    #[rstest]
    #[case(SecurityMode::Armed, "123", SecurityMode::Disarmed)]
    #[case(SecurityMode::Disarmed, "123", SecurityMode::Disarmed)]
    #[case(SecurityMode::Alarm, "123", SecurityMode::Disarmed)]
    #[case(SecurityMode::Armed, "258", SecurityMode::Armed)]
    #[case(SecurityMode::Disarmed, "258", SecurityMode::Armed)]
    #[case(SecurityMode::Alarm, "258", SecurityMode::Armed)]
    #[case(SecurityMode::Alarm, "0", SecurityMode::Armed)]
    #[case(SecurityMode::Disarmed, "0", SecurityMode::Armed)]
    fn test_matched_codes(
        #[case] from: SecurityMode,
        #[case] digits: &str,
        #[case] to: SecurityMode,
    ) {
        let mut machine = machine_in(from);

        let transition = machine.apply_entry(&entry(digits)).unwrap();

        assert_eq!(machine.mode(), to);
        assert_eq!(transition.from, from);
        assert_eq!(transition.to, to);
        assert_eq!(transition.cause, TransitionCause::Keypad);
    }

    #[rstest]
    #[case(SecurityMode::Armed, "")]
    #[case(SecurityMode::Disarmed, "1")]
    #[case(SecurityMode::Alarm, "1234")]
    #[case(SecurityMode::Alarm, "00")]
    fn test_unmatched_codes_are_ignored(#[case] from: SecurityMode, #[case] digits: &str) {
        let mut machine = machine_in(from);

        assert!(machine.apply_entry(&entry(digits)).is_none());
        assert_eq!(machine.mode(), from);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_trigger_alarm_from_armed() {
        let mut machine = SecurityStateMachine::default();

        let transition = machine.trigger_alarm().unwrap();

        assert_eq!(machine.mode(), SecurityMode::Alarm);
        assert_eq!(transition.cause, TransitionCause::Motion);
        assert!(transition.is_change());
    }

    #[rstest]
    #[case(SecurityMode::Disarmed)]
    #[case(SecurityMode::Alarm)]
    fn test_trigger_alarm_ignored_unless_armed(#[case] from: SecurityMode) {
        let mut machine = machine_in(from);

        assert!(machine.trigger_alarm().is_none());
        assert_eq!(machine.mode(), from);
    }

    #[test]
    fn test_same_mode_code_is_recorded() {
        let mut machine = SecurityStateMachine::default();

        let transition = machine.apply_entry(&entry("258")).unwrap();

        assert!(!transition.is_change());
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut machine = SecurityStateMachine::default();

        for _ in 0..MAX_HISTORY_SIZE {
            machine.apply_entry(&entry("123"));
            machine.apply_entry(&entry("258"));
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        let last = machine.history().back().unwrap();
        assert_eq!(last.to, SecurityMode::Armed);
    }

    #[test]
    fn test_last_transitions() {
        let mut machine = SecurityStateMachine::default();
        machine.apply_entry(&entry("123"));
        machine.apply_entry(&entry("258"));
        machine.trigger_alarm();

        let last = machine.last_transitions(2);
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].to, SecurityMode::Armed);
        assert_eq!(last[1].to, SecurityMode::Alarm);

        assert_eq!(machine.last_transitions(10).len(), 3);
    }

    #[test]
    fn test_builder_truncates_history() {
        let history: VecDeque<_> = (0..MAX_HISTORY_SIZE + 10)
            .map(|_| {
                ModeTransition::new(
                    SecurityMode::Armed,
                    SecurityMode::Disarmed,
                    TransitionCause::Keypad,
                )
            })
            .collect();

        let machine = SecurityStateMachine::builder().with_history(history).build();
        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_transition_serialization() {
        let transition = ModeTransition::new(
            SecurityMode::Armed,
            SecurityMode::Alarm,
            TransitionCause::Motion,
        );

        let json = serde_json::to_string(&transition).unwrap();
        assert!(json.contains("\"from\":\"armed\""));
        assert!(json.contains("\"cause\":\"motion\""));

        let back: ModeTransition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, transition);
    }
}
