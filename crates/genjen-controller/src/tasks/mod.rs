//! The concurrently running controller tasks.
//!
//! ```text
//! ┌──────────┐  Submit / InputChanged  ┌────────────┐
//! │ Keypad   │────────────────────────►│            │──► Display
//! └──────────┘                         │ Controller │──► Indicator
//! ┌──────────┐  MotionAlarm            │            │
//! │ Motion   │────────────────────────►│            │──► StateStore
//! └──────────┘                         └────────────┘       │
//! ┌──────────┐  pattern (awaited)      ┌────────────┐       │
//! │ Alarm    │────────────────────────►│ Tone       │──► Buzzer
//! └──────────┘                         └────────────┘       │
//!        ▲          feedback tones from Keypad ──┘          │
//!        └───────────────── reads mode ─────────────────────┘
//! ```
//!
//! Each loop runs once per scheduling tick and stops when the shared
//! cancellation token fires.

pub mod alarm;
pub mod controller;
pub mod keypad;
pub mod motion;
pub mod tone;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{ControllerError, Result};
use crate::store::StateStore;
use crate::tone::ToneQueue;
use controller::Request;

/// Everything a task needs besides its own device.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub store: Arc<StateStore>,
    pub requests: mpsc::Sender<Request>,
    pub tones: ToneQueue,
    pub tick: Duration,
    pub cancel: CancellationToken,
}

impl TaskContext {
    /// Send a request to the controller task.
    pub async fn request(&self, request: Request) -> Result<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| ControllerError::channel_closed("controller requests"))
    }
}

/// Ticker for a task loop.
///
/// A late tick is delayed rather than made up for, so a task that was held
/// up (by a blocking tone, say) does not burst through missed iterations.
pub(crate) fn ticker(tick: Duration) -> Interval {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
