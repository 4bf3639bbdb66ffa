//! Hardware abstraction layer for the GenJen security controller.
//!
//! This crate defines the interface between the controller core and the
//! panel hardware: a keypad scanner, a 16x2 character display, a tri-color
//! indicator LED, a piezo buzzer and a PIR motion sensor. The core only
//! depends on the traits in [`traits`], so the same tasks run against real
//! drivers, the [`mock`] devices in tests, or the [`console`] devices on a
//! development machine.
//!
//! # Design Philosophy
//!
//! - **Async-first**: every operation is an `async fn` returning a `Send`
//!   future, so tasks generic over devices can be spawned on Tokio.
//! - **Polling**: input devices never wait for input. A keypad scan returns
//!   at most one key, a motion sample returns the current level.
//! - **Error-aware**: all operations return [`Result<T>`] with a
//!   [`HardwareError`].
//!
//! # Example
//!
//! ```no_run
//! use genjen_hardware::traits::{DisplayDevice, KeypadDevice};
//! use genjen_hardware::{Key, Result};
//!
//! async fn echo_digits<K, D>(keypad: &mut K, display: &mut D) -> Result<()>
//! where
//!     K: KeypadDevice,
//!     D: DisplayDevice,
//! {
//!     let mut typed = String::new();
//!
//!     loop {
//!         match keypad.poll_key().await? {
//!             Some(Key::Digit(d)) => {
//!                 typed.push(char::from(b'0' + d));
//!                 display.render_line(&typed, 1).await?;
//!             }
//!             Some(Key::Submit) => return Ok(()),
//!             _ => tokio::time::sleep(std::time::Duration::from_millis(15)).await,
//!         }
//!     }
//! }
//! ```

pub mod console;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{DisplayDevice, IndicatorDevice, KeypadDevice, MotionSensor, ToneDevice};
pub use types::{Key, ToneEvent, fit_line};
