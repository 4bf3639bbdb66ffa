//! GenJen controller crate.
//!
//! This crate contains the security state machine, the keypad and motion
//! logic that feeds it, and the tasks that run all of it concurrently
//! against the devices from `genjen-hardware`.
//!
//! # Components
//!
//! - **SecurityStateMachine**: Armed / Disarmed / Alarm with bounded history
//! - **InputBuffer** and **MotionAccumulator**: per-task input state
//! - **StateStore**: the published mode and alarm log, readable from anywhere
//! - **System**: spawns the controller, keypad, motion, alarm and tone tasks

pub mod error;
pub mod input;
pub mod motion;
pub mod panel;
pub mod runtime;
pub mod state_machine;
pub mod store;
pub mod tasks;
pub mod tone;

pub use error::{ControllerError, Result};
pub use input::{InputBuffer, KeyOutcome};
pub use motion::MotionAccumulator;
pub use panel::Panel;
pub use runtime::{
    Peripherals, ShutdownReport, System, SystemHandle, TaskName, TaskTermination,
};
pub use state_machine::{
    ModeTransition, SecurityStateMachine, SecurityStateMachineBuilder, TransitionCause,
};
pub use store::{AlarmLog, StateStore};
pub use tasks::controller::Request;
pub use tone::{Tone, ToneQueue, ToneRequest, ToneStep};
