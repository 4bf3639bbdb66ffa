//! Shared state store.
//!
//! The store holds what the rest of the system may observe about the
//! controller: the published security mode and the alarm log. Only the
//! controller task writes to it. Every other task, and the status server,
//! reads.
//!
//! The mode is kept as its raw `u8` encoding in an atomic. Readers that
//! render it go through [`Indication::for_raw`], so an out-of-range value
//! shows up as "Invalid state" instead of failing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};

use genjen_core::constants::MAX_ALARM_LOG_SIZE;
use genjen_core::{AlarmRecord, Indication, SecurityMode};
use tokio::sync::RwLock;

/// Published controller state, shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use genjen_controller::StateStore;
/// use genjen_core::SecurityMode;
///
/// let store = StateStore::new(SecurityMode::Armed);
/// assert_eq!(store.mode(), Some(SecurityMode::Armed));
/// assert_eq!(store.indication().label, "Aktiveret");
/// ```
#[derive(Debug)]
pub struct StateStore {
    mode: AtomicU8,
    alarms: RwLock<AlarmLog>,
}

impl StateStore {
    pub fn new(initial: SecurityMode) -> Self {
        Self {
            mode: AtomicU8::new(initial.to_u8()),
            alarms: RwLock::new(AlarmLog::default()),
        }
    }

    /// Raw published mode value.
    pub fn mode_raw(&self) -> u8 {
        self.mode.load(Ordering::Acquire)
    }

    /// Published mode, or `None` if the raw value is not a known mode.
    pub fn mode(&self) -> Option<SecurityMode> {
        SecurityMode::from_u8(self.mode_raw()).ok()
    }

    /// Label and indicator color for the published mode.
    pub fn indication(&self) -> Indication {
        Indication::for_raw(self.mode_raw())
    }

    pub fn is_armed(&self) -> bool {
        self.mode().is_some_and(SecurityMode::is_armed)
    }

    pub fn is_alarm(&self) -> bool {
        self.mode().is_some_and(SecurityMode::is_alarm)
    }

    pub(crate) fn publish(&self, mode: SecurityMode) {
        self.mode.store(mode.to_u8(), Ordering::Release);
    }

    /// Overwrite the published value with an arbitrary raw byte.
    ///
    /// Nothing in the controller ever does this. It exists so the
    /// invalid-state rendering path can be exercised.
    pub fn force_raw(&self, raw: u8) {
        self.mode.store(raw, Ordering::Release);
    }

    pub(crate) async fn record_alarm(&self, record: AlarmRecord) {
        self.alarms.write().await.push(record);
    }

    /// Alarm activations, newest first.
    pub async fn alarms(&self) -> Vec<AlarmRecord> {
        self.alarms.read().await.newest_first()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(SecurityMode::Armed)
    }
}

/// Bounded log of alarm activations.
#[derive(Debug, Clone, Default)]
pub struct AlarmLog {
    records: VecDeque<AlarmRecord>,
}

impl AlarmLog {
    /// Append a record, dropping the oldest beyond [`MAX_ALARM_LOG_SIZE`].
    pub fn push(&mut self, record: AlarmRecord) {
        self.records.push_back(record);
        if self.records.len() > MAX_ALARM_LOG_SIZE {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn newest_first(&self) -> Vec<AlarmRecord> {
        self.records.iter().rev().cloned().collect()
    }
}
