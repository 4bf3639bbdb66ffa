//! Mock device implementations for testing and development.
//!
//! This module provides simulated adapters that can be controlled
//! programmatically without requiring physical hardware.

pub mod buzzer;
pub mod display;
pub mod indicator;
pub mod keypad;
pub mod motion;

// Re-export commonly used types
pub use buzzer::{MockBuzzer, MockBuzzerHandle};
pub use display::{MockDisplay, MockDisplayHandle};
pub use indicator::{MockIndicator, MockIndicatorHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use motion::{MockMotionHandle, MockMotionSensor};
