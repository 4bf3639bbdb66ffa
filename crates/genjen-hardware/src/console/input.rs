//! Keypad and motion sensor fed from standard input.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::traits::{KeypadDevice, MotionSensor};
use crate::{HardwareError, Key, Result};

/// Character that toggles the simulated motion sensor.
pub const MOTION_TOGGLE: char = 'm';

/// Reader task that turns stdin lines into key presses and motion toggles.
///
/// Every keypad character on a line (`0`-`9`, `*`, `#`) becomes one key
/// press, in order. [`MOTION_TOGGLE`] flips the motion level. Anything else
/// is ignored.
pub struct ConsoleInput;

impl ConsoleInput {
    /// Spawn the stdin reader and return the devices it drives.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn() -> (ConsoleKeypad, ConsoleMotion) {
        let (key_tx, key_rx) = mpsc::unbounded_channel();
        let motion = Arc::new(AtomicBool::new(false));

        tokio::spawn(read_stdin(key_tx, Arc::clone(&motion)));

        (ConsoleKeypad { key_rx }, ConsoleMotion { motion })
    }
}

async fn read_stdin(key_tx: mpsc::UnboundedSender<Key>, motion: Arc<AtomicBool>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        for c in line.chars() {
            if c == MOTION_TOGGLE {
                let now = !motion.fetch_xor(true, Ordering::Relaxed);
                info!(motion = now, "Motion toggled");
            } else if let Some(key) = Key::from_char(c) {
                if key_tx.send(key).is_err() {
                    return;
                }
            } else if !c.is_whitespace() {
                debug!(input = %c, "Ignoring console input");
            }
        }
    }

    debug!("Console input closed");
}

/// Keypad half of [`ConsoleInput`].
#[derive(Debug)]
pub struct ConsoleKeypad {
    key_rx: mpsc::UnboundedReceiver<Key>,
}

impl KeypadDevice for ConsoleKeypad {
    async fn poll_key(&mut self) -> Result<Option<Key>> {
        match self.key_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(HardwareError::disconnected("Console keypad"))
            }
        }
    }
}

/// Motion sensor half of [`ConsoleInput`].
#[derive(Debug, Clone)]
pub struct ConsoleMotion {
    motion: Arc<AtomicBool>,
}

impl MotionSensor for ConsoleMotion {
    async fn sample(&mut self) -> Result<bool> {
        Ok(self.motion.load(Ordering::Relaxed))
    }
}
