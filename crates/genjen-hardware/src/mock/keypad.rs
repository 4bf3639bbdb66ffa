//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated keypad that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{HardwareError, Key, Result, traits::KeypadDevice};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Mock keypad device for testing and development.
///
/// Keys sent through a [`MockKeypadHandle`] are queued and handed out one
/// per [`poll_key`](KeypadDevice::poll_key) call, like a real scanner that
/// sees one press per scan.
///
/// # Examples
///
/// ```
/// use genjen_hardware::mock::MockKeypad;
/// use genjen_hardware::traits::KeypadDevice;
/// use genjen_hardware::Key;
///
/// #[tokio::main]
/// async fn main() -> genjen_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.press_all("12#")?;
///
///     assert_eq!(keypad.poll_key().await?, Some(Key::Digit(1)));
///     assert_eq!(keypad.poll_key().await?, Some(Key::Digit(2)));
///     assert_eq!(keypad.poll_key().await?, Some(Key::Submit));
///     assert_eq!(keypad.poll_key().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated key presses
    key_rx: mpsc::UnboundedReceiver<Key>,
}

impl MockKeypad {
    /// Create a new mock keypad.
    ///
    /// Returns a tuple of (MockKeypad, MockKeypadHandle) where the handle
    /// can be used to simulate key presses.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::unbounded_channel();
        (Self { key_rx }, MockKeypadHandle { key_tx })
    }
}

impl KeypadDevice for MockKeypad {
    async fn poll_key(&mut self) -> Result<Option<Key>> {
        match self.key_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(HardwareError::disconnected("Keypad input channel closed"))
            }
        }
    }
}

/// Handle for controlling a mock keypad.
///
/// The handle can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated key presses
    key_tx: mpsc::UnboundedSender<Key>,
}

impl MockKeypadHandle {
    /// Queue a single key press.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub fn press(&self, key: Key) -> Result<()> {
        self.key_tx
            .send(key)
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Queue every key printed in `keys`, e.g. `"123#"`.
    ///
    /// # Errors
    ///
    /// Returns an error if a character is not on the keypad or the keypad
    /// has been dropped. Keys before the offending character stay queued.
    pub fn press_all(&self, keys: &str) -> Result<()> {
        for c in keys.chars() {
            let key = Key::from_char(c)
                .ok_or_else(|| HardwareError::invalid_data(format!("No key for {c:?}")))?;
            self.press(key)?;
        }
        Ok(())
    }

    /// Queue a complete code followed by the submit key.
    ///
    /// # Errors
    ///
    /// Same as [`press_all`](Self::press_all).
    pub fn enter_code(&self, digits: &str) -> Result<()> {
        self.press_all(digits)?;
        self.press(Key::Submit)
    }
}
