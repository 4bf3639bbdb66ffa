//! Motion surveillance task.

use genjen_hardware::traits::MotionSensor;
use tracing::{info, warn};

use super::controller::Request;
use super::{TaskContext, ticker};
use crate::error::Result;
use crate::motion::MotionAccumulator;

/// Sample the motion sensor once per tick.
///
/// Samples only count while the published mode is `Armed`; in any other
/// mode they are read and discarded. When the accumulator reaches its
/// threshold a [`Request::MotionAlarm`] is posted to the controller.
///
/// # Errors
///
/// Returns an error if the sensor is disconnected or the controller task
/// is gone. Other sensor errors are logged and sampling continues.
pub async fn motion_task<M: MotionSensor>(
    mut sensor: M,
    mut accumulator: MotionAccumulator,
    ctx: TaskContext,
) -> Result<()> {
    let mut ticker = ticker(ctx.tick);

    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => return Ok(()),
            _ = ticker.tick() => {}
        }

        let motion = match sensor.sample().await {
            Ok(motion) => motion,
            Err(e) if e.is_disconnected() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Motion sample failed");
                continue;
            }
        };

        if ctx.store.is_armed() && accumulator.record(motion) {
            info!(
                threshold = accumulator.threshold(),
                "Sustained motion detected"
            );
            ctx.request(Request::MotionAlarm).await?;
        }
    }
}
