//! Console adapters for running the controller on a host machine.
//!
//! Input comes from stdin, one line at a time: keypad characters are
//! pressed in order and `m` toggles the motion sensor. Display, indicator
//! and tone output is reported through `tracing`.

pub mod input;
pub mod output;

pub use input::{ConsoleInput, ConsoleKeypad, ConsoleMotion, MOTION_TOGGLE};
pub use output::{ConsoleBuzzer, ConsoleDisplay, ConsoleIndicator};
