//! Tone task: the only user of the buzzer.

use std::time::Duration;

use genjen_hardware::traits::ToneDevice;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Result;
use crate::tone::ToneRequest;

/// Play queued tone requests one after another.
///
/// Each step lasts `step.ticks` scheduling ticks. A request's completion
/// signal fires after its last step, even if the buzzer reported errors.
/// The task ends when cancelled or when every [`ToneQueue`](crate::ToneQueue)
/// has been dropped.
pub async fn tone_task<T: ToneDevice>(
    mut buzzer: T,
    mut requests: mpsc::Receiver<ToneRequest>,
    tick: Duration,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        let request = tokio::select! {
            _ = cancel.cancelled() => break,
            request = requests.recv() => request,
        };
        let Some(request) = request else {
            break;
        };

        for step in &request.steps {
            if let Err(e) = buzzer.emit_tone(step.pitch_hz, tick * step.ticks).await {
                warn!(error = %e, pitch_hz = step.pitch_hz, "Failed to emit tone");
            }
        }

        if let Some(done) = request.done {
            let _ = done.send(());
        }
    }

    debug!("Tone task stopped");
    Ok(())
}
