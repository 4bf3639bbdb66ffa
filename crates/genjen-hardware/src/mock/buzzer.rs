//! Mock buzzer.
//!
//! Every tone is reported to the handle and then held for its full
//! duration with `tokio::time::sleep`, so timing behaves like the real
//! blocking driver (and is instant under a paused test clock).

use std::time::Duration;

use tokio::sync::mpsc;

use crate::{Result, ToneEvent, traits::ToneDevice};

/// Buzzer that records the tones it plays.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use genjen_hardware::mock::MockBuzzer;
/// use genjen_hardware::traits::ToneDevice;
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() -> genjen_hardware::Result<()> {
///     let (mut buzzer, mut handle) = MockBuzzer::new();
///
///     buzzer.emit_tone(650, Duration::from_millis(150)).await?;
///
///     let tone = handle.try_next().unwrap();
///     assert_eq!(tone.pitch_hz, 650);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockBuzzer {
    tone_tx: mpsc::UnboundedSender<ToneEvent>,
}

impl MockBuzzer {
    pub fn new() -> (Self, MockBuzzerHandle) {
        let (tone_tx, tone_rx) = mpsc::unbounded_channel();
        (Self { tone_tx }, MockBuzzerHandle { tone_rx })
    }
}

impl ToneDevice for MockBuzzer {
    async fn emit_tone(&mut self, pitch_hz: u16, duration: Duration) -> Result<()> {
        // A dropped handle just means nobody is listening.
        let _ = self.tone_tx.send(ToneEvent { pitch_hz, duration });
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

/// Receiving side of a [`MockBuzzer`].
#[derive(Debug)]
pub struct MockBuzzerHandle {
    tone_rx: mpsc::UnboundedReceiver<ToneEvent>,
}

impl MockBuzzerHandle {
    /// Wait for the next tone. Returns `None` once the buzzer is dropped
    /// and every tone has been read.
    pub async fn next(&mut self) -> Option<ToneEvent> {
        self.tone_rx.recv().await
    }

    /// Next tone if one has already started.
    pub fn try_next(&mut self) -> Option<ToneEvent> {
        self.tone_rx.try_recv().ok()
    }

    /// Every tone started so far that has not been read yet.
    pub fn drain(&mut self) -> Vec<ToneEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tone_blocks_for_duration() {
        let (mut buzzer, mut handle) = MockBuzzer::new();
        let start = tokio::time::Instant::now();

        buzzer
            .emit_tone(250, Duration::from_millis(75))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(75));
        assert_eq!(
            handle.try_next(),
            Some(ToneEvent {
                pitch_hz: 250,
                duration: Duration::from_millis(75)
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_in_order() {
        let (mut buzzer, mut handle) = MockBuzzer::new();

        for pitch in [250, 500, 750] {
            buzzer
                .emit_tone(pitch, Duration::from_millis(5))
                .await
                .unwrap();
        }

        let pitches: Vec<u16> = handle.drain().iter().map(|t| t.pitch_hz).collect();
        assert_eq!(pitches, vec![250, 500, 750]);
        assert!(handle.drain().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_without_listener() {
        let (mut buzzer, handle) = MockBuzzer::new();
        drop(handle);

        assert!(buzzer.emit_tone(100, Duration::from_millis(1)).await.is_ok());
    }
}
