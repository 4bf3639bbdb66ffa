//! Alarm annunciation task.

use tracing::trace;

use super::{TaskContext, ticker};
use crate::error::Result;
use crate::tone::alarm_pattern;

/// Play the alarm pattern once per tick while the mode is `Alarm`.
///
/// Each pass waits until the whole pattern has played, so leaving `Alarm`
/// takes effect from the next pass on.
///
/// # Errors
///
/// Returns an error if the tone task is gone.
pub async fn alarm_task(ctx: TaskContext) -> Result<()> {
    let mut ticker = ticker(ctx.tick);
    let pattern = alarm_pattern();

    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => return Ok(()),
            _ = ticker.tick() => {}
        }

        if ctx.store.is_alarm() {
            trace!("Sounding alarm pattern");
            tokio::select! {
                _ = ctx.cancel.cancelled() => return Ok(()),
                played = ctx.tones.play(&pattern) => played?,
            }
        }
    }
}
