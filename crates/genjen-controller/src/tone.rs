//! Tone requests and the queue that feeds the tone task.
//!
//! The buzzer is driven by a single task (see
//! [`tone_task`](crate::tasks::tone::tone_task)). Everything else asks for
//! tones through a [`ToneQueue`]:
//!
//! - keypad feedback is fire-and-forget and dropped when the queue is full
//! - the alarm pattern is queued and awaited until it has finished playing

use genjen_core::constants::{
    ALARM_PATTERN_HZ, ALARM_TONE_TICKS, CLEAR_TONE_HZ, CONFIRM_TONE_HZ, DIGIT_TONE_FACTOR,
    FEEDBACK_TONE_TICKS, REJECT_TONE_HZ,
};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::error::{ControllerError, Result};

/// Keypad feedback tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Input buffer cleared.
    Clear,

    /// Entry submitted.
    Confirm,

    /// Digit rejected by a full buffer.
    Reject,

    /// Digit appended. The pitch follows the digit's character code.
    Digit(char),
}

impl Tone {
    /// Pitch in Hz.
    ///
    /// ```
    /// use genjen_controller::Tone;
    ///
    /// assert_eq!(Tone::Digit('0').pitch_hz(), 480);
    /// assert_eq!(Tone::Digit('9').pitch_hz(), 570);
    /// assert_eq!(Tone::Confirm.pitch_hz(), 650);
    /// ```
    pub fn pitch_hz(self) -> u16 {
        match self {
            Tone::Clear => CLEAR_TONE_HZ,
            Tone::Confirm => CONFIRM_TONE_HZ,
            Tone::Reject => REJECT_TONE_HZ,
            Tone::Digit(c) => u16::try_from(u32::from(c))
                .unwrap_or(u16::MAX / DIGIT_TONE_FACTOR)
                .saturating_mul(DIGIT_TONE_FACTOR),
        }
    }

    pub fn step(self) -> ToneStep {
        ToneStep {
            pitch_hz: self.pitch_hz(),
            ticks: FEEDBACK_TONE_TICKS,
        }
    }
}

/// One tone of a sequence, with its length in scheduling ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStep {
    pub pitch_hz: u16,
    pub ticks: u32,
}

/// The four-step alarm siren: up and back down.
pub fn alarm_pattern() -> [ToneStep; 4] {
    ALARM_PATTERN_HZ.map(|pitch_hz| ToneStep {
        pitch_hz,
        ticks: ALARM_TONE_TICKS,
    })
}

/// A sequence of tones for the tone task.
#[derive(Debug)]
pub struct ToneRequest {
    pub steps: Vec<ToneStep>,

    /// Signalled once every step has played.
    pub done: Option<oneshot::Sender<()>>,
}

/// Sending side of the tone queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ToneQueue {
    tx: mpsc::Sender<ToneRequest>,
}

impl ToneQueue {
    /// Create a queue holding at most `capacity` pending requests.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ToneRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queue a feedback tone without waiting.
    ///
    /// Returns `false` if the tone was dropped because the queue is full
    /// or the tone task is gone.
    pub fn feedback(&self, tone: Tone) -> bool {
        let request = ToneRequest {
            steps: vec![tone.step()],
            done: None,
        };

        match self.tx.try_send(request) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(?tone, "Tone queue full, dropping feedback tone");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(?tone, "Tone task gone, dropping feedback tone");
                false
            }
        }
    }

    /// Queue a sequence and wait until it has finished playing.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::ChannelClosed` if the tone task is gone.
    pub async fn play(&self, steps: &[ToneStep]) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        let request = ToneRequest {
            steps: steps.to_vec(),
            done: Some(done_tx),
        };

        self.tx
            .send(request)
            .await
            .map_err(|_| ControllerError::channel_closed("tone queue"))?;

        done_rx
            .await
            .map_err(|_| ControllerError::channel_closed("tone completion"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Tone::Clear, 200)]
    #[case(Tone::Confirm, 650)]
    #[case(Tone::Reject, 100)]
    #[case(Tone::Digit('1'), 490)]
    #[case(Tone::Digit('5'), 530)]
    fn test_pitches(#[case] tone: Tone, #[case] pitch: u16) {
        assert_eq!(tone.pitch_hz(), pitch);
        assert_eq!(tone.step().ticks, 10);
    }

    #[test]
    fn test_alarm_pattern() {
        let pattern = alarm_pattern();
        let pitches: Vec<u16> = pattern.iter().map(|s| s.pitch_hz).collect();

        assert_eq!(pitches, vec![250, 500, 750, 500]);
        assert!(pattern.iter().all(|s| s.ticks == 5));
    }

    #[test]
    fn test_feedback_dropped_when_full() {
        let (queue, _rx) = ToneQueue::channel(1);

        assert!(queue.feedback(Tone::Clear));
        assert!(!queue.feedback(Tone::Confirm));
    }

    #[test]
    fn test_feedback_dropped_when_closed() {
        let (queue, rx) = ToneQueue::channel(1);
        drop(rx);

        assert!(!queue.feedback(Tone::Clear));
    }

    #[tokio::test]
    async fn test_play_waits_for_completion() {
        let (queue, mut rx) = ToneQueue::channel(4);

        let player = tokio::spawn(async move {
            let request = rx.recv().await.unwrap();
            assert_eq!(request.steps.len(), 4);
            request.done.unwrap().send(()).unwrap();
        });

        queue.play(&alarm_pattern()).await.unwrap();
        player.await.unwrap();
    }

    #[tokio::test]
    async fn test_play_fails_when_request_dropped() {
        let (queue, mut rx) = ToneQueue::channel(4);

        tokio::spawn(async move {
            // Drop the request without signalling completion
            let _ = rx.recv().await;
        });

        let result = queue.play(&alarm_pattern()).await;
        assert!(matches!(result, Err(ControllerError::ChannelClosed { .. })));
    }
}
