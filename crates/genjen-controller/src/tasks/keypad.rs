//! Keypad input task.

use genjen_hardware::traits::KeypadDevice;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::controller::Request;
use super::{TaskContext, ticker};
use crate::error::{ControllerError, Result};
use crate::input::{InputBuffer, KeyOutcome};
use crate::tone::Tone;

/// Poll the keypad once per tick and turn key presses into requests.
///
/// Feedback tones are suppressed while the alarm is sounding. The submit
/// tone plays only if the mode after the submit is not `Alarm`.
///
/// # Errors
///
/// Returns an error if the keypad is disconnected or the controller task
/// is gone. Other keypad errors are logged and the next tick polls again.
pub async fn keypad_task<K: KeypadDevice>(
    mut keypad: K,
    mut buffer: InputBuffer,
    ctx: TaskContext,
) -> Result<()> {
    let mut ticker = ticker(ctx.tick);

    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => return Ok(()),
            _ = ticker.tick() => {}
        }

        let key = match keypad.poll_key().await {
            Ok(Some(key)) => key,
            Ok(None) => continue,
            Err(e) if e.is_disconnected() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Keypad scan failed");
                continue;
            }
        };

        match buffer.press(key) {
            KeyOutcome::Cleared => {
                ctx.request(Request::InputChanged(String::new())).await?;
                feedback(&ctx, Tone::Clear);
            }
            KeyOutcome::Appended(digit) => {
                ctx.request(Request::InputChanged(buffer.as_str().to_string()))
                    .await?;
                feedback(&ctx, Tone::Digit(digit));
            }
            KeyOutcome::Rejected => {
                debug!(capacity = buffer.capacity(), "Input buffer full");
                feedback(&ctx, Tone::Reject);
            }
            KeyOutcome::Submitted(entry) => {
                let (reply, mode) = oneshot::channel();
                ctx.request(Request::Submit { entry, reply }).await?;

                let mode = mode
                    .await
                    .map_err(|_| ControllerError::channel_closed("submit reply"))?;
                if !mode.is_alarm() {
                    ctx.tones.feedback(Tone::Confirm);
                }
            }
        }
    }
}

fn feedback(ctx: &TaskContext, tone: Tone) {
    if !ctx.store.is_alarm() {
        ctx.tones.feedback(tone);
    }
}
