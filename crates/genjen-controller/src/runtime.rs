//! System runtime: wires devices to tasks and supervises them.
//!
//! # Examples
//!
//! ```no_run
//! use genjen_controller::{Peripherals, System};
//! use genjen_core::ControllerConfig;
//! use genjen_hardware::mock::{
//!     MockBuzzer, MockDisplay, MockIndicator, MockKeypad, MockMotionSensor,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let (keypad, keys) = MockKeypad::new();
//!     let (display, _) = MockDisplay::new();
//!     let (indicator, _) = MockIndicator::new();
//!     let (buzzer, _) = MockBuzzer::new();
//!     let (motion, _) = MockMotionSensor::new();
//!
//!     let handle = System::new(ControllerConfig::default()).start(Peripherals {
//!         keypad,
//!         display,
//!         indicator,
//!         buzzer,
//!         motion,
//!     });
//!
//!     keys.enter_code("123").unwrap();
//!
//!     let report = handle.shutdown().await;
//!     assert_eq!(report.panics, 0);
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use genjen_core::{ControllerConfig, SecurityMode};
use genjen_hardware::traits::{
    DisplayDevice, IndicatorDevice, KeypadDevice, MotionSensor, ToneDevice,
};
use tokio::sync::mpsc;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::input::InputBuffer;
use crate::motion::MotionAccumulator;
use crate::panel::Panel;
use crate::state_machine::SecurityStateMachine;
use crate::store::StateStore;
use crate::tasks::controller::Controller;
use crate::tasks::{TaskContext, alarm, keypad, motion, tone};
use crate::tone::ToneQueue;

/// Capacity of the controller request channel.
const REQUEST_CHANNEL_CAPACITY: usize = 32;

/// How long tasks get to stop on their own before being aborted.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// The devices the controller drives.
#[derive(Debug)]
pub struct Peripherals<K, D, I, T, M> {
    pub keypad: K,
    pub display: D,
    pub indicator: I,
    pub buzzer: T,
    pub motion: M,
}

/// A configured, not yet started controller.
#[derive(Debug)]
pub struct System {
    config: ControllerConfig,
    store: Arc<StateStore>,
}

impl System {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            store: Arc::new(StateStore::new(SecurityMode::Armed)),
        }
    }

    /// Shared state store, for readers such as the status server.
    pub fn store(&self) -> Arc<StateStore> {
        Arc::clone(&self.store)
    }

    /// Spawn every controller task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<K, D, I, T, M>(self, peripherals: Peripherals<K, D, I, T, M>) -> SystemHandle
    where
        K: KeypadDevice + 'static,
        D: DisplayDevice + 'static,
        I: IndicatorDevice + 'static,
        T: ToneDevice + 'static,
        M: MotionSensor + 'static,
    {
        let Peripherals {
            keypad,
            display,
            indicator,
            buzzer,
            motion,
        } = peripherals;

        let cancel = CancellationToken::new();
        let tick = self.config.tick();
        let (request_tx, request_rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let (tones, tone_rx) = ToneQueue::channel(self.config.tone_queue_capacity);

        let ctx = TaskContext {
            store: Arc::clone(&self.store),
            requests: request_tx,
            tones,
            tick,
            cancel: cancel.clone(),
        };

        let machine = SecurityStateMachine::builder()
            .with_codes(self.config.codes.clone())
            .build();
        let controller = Controller::new(
            machine,
            Panel::new(display, indicator),
            Arc::clone(&self.store),
            request_rx,
        );

        let mut handle = SystemHandle {
            store: self.store,
            cancel: cancel.clone(),
            tasks: JoinSet::new(),
            names: HashMap::new(),
        };

        handle.spawn(TaskName::Controller, controller.run(cancel.clone()));
        handle.spawn(
            TaskName::Tone,
            tone::tone_task(buzzer, tone_rx, tick, cancel.clone()),
        );
        handle.spawn(
            TaskName::Keypad,
            keypad::keypad_task(
                keypad,
                InputBuffer::new(self.config.max_input_len),
                ctx.clone(),
            ),
        );
        handle.spawn(
            TaskName::Motion,
            motion::motion_task(
                motion,
                MotionAccumulator::new(self.config.motion_threshold),
                ctx.clone(),
            ),
        );
        handle.spawn(TaskName::Alarm, alarm::alarm_task(ctx));

        info!(
            tick_ms = self.config.tick_ms,
            motion_threshold = self.config.motion_threshold,
            "Controller tasks started"
        );
        handle
    }
}

/// Name of a supervised task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskName {
    Controller,
    Keypad,
    Motion,
    Alarm,
    Tone,
    Network,
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controller => write!(f, "controller"),
            Self::Keypad => write!(f, "keypad"),
            Self::Motion => write!(f, "motion"),
            Self::Alarm => write!(f, "alarm"),
            Self::Tone => write!(f, "tone"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// How a task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTermination {
    /// Task completed successfully.
    Success,
    /// Task returned an error.
    Error(String),
    /// Task was aborted (expected during shutdown).
    Cancelled,
    /// Task panicked.
    Panic,
}

/// Counts of task terminations collected during shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    pub success: usize,
    pub errors: usize,
    pub cancelled: usize,
    pub panics: usize,
}

impl ShutdownReport {
    fn record(&mut self, termination: &TaskTermination) {
        match termination {
            TaskTermination::Success => self.success += 1,
            TaskTermination::Error(_) => self.errors += 1,
            TaskTermination::Cancelled => self.cancelled += 1,
            TaskTermination::Panic => self.panics += 1,
        }
    }
}

type TaskOutput = (TaskName, std::result::Result<(), String>);

/// Handle to the running system.
///
/// Dropping the handle aborts every task at once. Call
/// [`shutdown`](Self::shutdown) to give them a chance to stop cleanly.
pub struct SystemHandle {
    store: Arc<StateStore>,
    cancel: CancellationToken,
    tasks: JoinSet<TaskOutput>,
    names: HashMap<Id, TaskName>,
}

impl SystemHandle {
    /// Shared state store.
    pub fn store(&self) -> Arc<StateStore> {
        Arc::clone(&self.store)
    }

    /// Token that is cancelled when the system shuts down.
    ///
    /// Extra tasks spawned with [`spawn`](Self::spawn) should stop when it
    /// fires.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Supervise an additional task, such as the status server.
    pub fn spawn<F, E>(&mut self, name: TaskName, task: F)
    where
        F: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let abort = self.tasks.spawn(async move {
            let result = task.await.map_err(|e| e.to_string());
            (name, result)
        });
        self.names.insert(abort.id(), name);
        debug!(task = %name, "Task spawned");
    }

    /// Wait for the next task to end on its own.
    ///
    /// Returns `None` if no task is running.
    pub async fn wait_next(&mut self) -> Option<(TaskName, TaskTermination)> {
        let result = self.tasks.join_next_with_id().await?;
        Some(self.classify(result))
    }

    /// Stop every task.
    ///
    /// Tasks are asked to stop through the cancellation token and get a
    /// short grace period; whatever is still running after that is
    /// aborted. Errors and panics are logged and counted, never returned.
    pub async fn shutdown(mut self) -> ShutdownReport {
        self.cancel.cancel();

        let mut report = ShutdownReport::default();
        let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;

        loop {
            let next = tokio::time::timeout_at(deadline, self.tasks.join_next_with_id()).await;
            match next {
                Ok(Some(result)) => self.log_and_record(result, &mut report),
                Ok(None) => break,
                Err(_) => {
                    warn!(remaining = self.tasks.len(), "Aborting tasks after grace period");
                    self.tasks.abort_all();
                    while let Some(result) = self.tasks.join_next_with_id().await {
                        self.log_and_record(result, &mut report);
                    }
                    break;
                }
            }
        }

        info!(
            success = report.success,
            errors = report.errors,
            cancelled = report.cancelled,
            panics = report.panics,
            "System stopped"
        );
        report
    }

    fn log_and_record(
        &mut self,
        result: std::result::Result<(Id, TaskOutput), JoinError>,
        report: &mut ShutdownReport,
    ) {
        let (name, termination) = self.classify(result);
        match &termination {
            TaskTermination::Error(e) => error!(task = %name, error = %e, "Task failed"),
            TaskTermination::Panic => error!(task = %name, "Task panicked"),
            _ => debug!(task = %name, ?termination, "Task ended"),
        }
        report.record(&termination);
    }

    /// Classify the termination status of a task.
    fn classify(
        &mut self,
        result: std::result::Result<(Id, TaskOutput), JoinError>,
    ) -> (TaskName, TaskTermination) {
        match result {
            Ok((id, (name, outcome))) => {
                self.names.remove(&id);
                let termination = match outcome {
                    Ok(()) => TaskTermination::Success,
                    Err(e) => TaskTermination::Error(e),
                };
                (name, termination)
            }
            Err(e) => {
                let name = self.names.remove(&e.id()).unwrap_or(TaskName::Controller);
                let termination = if e.is_cancelled() {
                    TaskTermination::Cancelled
                } else {
                    TaskTermination::Panic
                };
                (name, termination)
            }
        }
    }
}
