//! Hardware adapter trait definitions.
//!
//! These traits are the whole contract between the controller core and the
//! panel hardware. The core never touches pins, buses or sockets directly;
//! it only polls keys and motion samples and pushes text, colors and tones.
//!
//! # Send futures
//!
//! Every method returns `impl Future + Send` so generic task functions can
//! be handed to `tokio::spawn`. Implementations can still be written with
//! plain `async fn`:
//!
//! ```
//! use genjen_hardware::traits::MotionSensor;
//! use genjen_hardware::Result;
//!
//! struct AlwaysQuiet;
//!
//! impl MotionSensor for AlwaysQuiet {
//!     async fn sample(&mut self) -> Result<bool> {
//!         Ok(false)
//!     }
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use crate::error::Result;
use crate::types::Key;

/// Keypad scanner.
///
/// A scan returns at most one key per call and never waits for a key to be
/// pressed.
///
/// # Examples
///
/// ```no_run
/// use genjen_hardware::traits::KeypadDevice;
/// use genjen_hardware::{Key, Result};
///
/// async fn wait_for_submit<K: KeypadDevice>(keypad: &mut K) -> Result<()> {
///     loop {
///         if let Some(Key::Submit) = keypad.poll_key().await? {
///             return Ok(());
///         }
///         tokio::time::sleep(std::time::Duration::from_millis(15)).await;
///     }
/// }
/// ```
pub trait KeypadDevice: Send {
    /// Scan the keypad once.
    ///
    /// Returns `Ok(None)` when no key is pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or the scan fails.
    fn poll_key(&mut self) -> impl Future<Output = Result<Option<Key>>> + Send;
}

/// Character display with fixed-width rows.
pub trait DisplayDevice: Send {
    /// Overwrite a row with `text`.
    ///
    /// The row is blanked first, so shorter text never leaves remnants of
    /// the previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` does not exist or the write fails.
    fn render_line(&mut self, text: &str, row: usize) -> impl Future<Output = Result<()>> + Send;
}

/// Tri-color indicator LED.
pub trait IndicatorDevice: Send {
    /// Set the three channel intensities (0-255 each).
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set_indicator(
        &mut self,
        red: u8,
        green: u8,
        blue: u8,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Piezo buzzer.
pub trait ToneDevice: Send {
    /// Sound `pitch_hz` for `duration`, then silence.
    ///
    /// The returned future completes only after the tone has finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be driven.
    fn emit_tone(
        &mut self,
        pitch_hz: u16,
        duration: Duration,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Binary motion sensor (PIR).
pub trait MotionSensor: Send {
    /// Read the sensor once. `true` means motion is sensed right now.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor cannot be read.
    fn sample(&mut self) -> impl Future<Output = Result<bool>> + Send;
}
