//! Mock motion sensor.
//!
//! The sensor output is a level set through the handle. Every sample reads
//! the current level and is counted, so tests can check how often the
//! surveillance task looked at the sensor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::{Result, traits::MotionSensor};

/// Motion sensor driven by a [`MockMotionHandle`].
///
/// # Examples
///
/// ```
/// use genjen_hardware::mock::MockMotionSensor;
/// use genjen_hardware::traits::MotionSensor;
///
/// #[tokio::main]
/// async fn main() -> genjen_hardware::Result<()> {
///     let (mut sensor, handle) = MockMotionSensor::new();
///
///     assert!(!sensor.sample().await?);
///     handle.set_motion(true);
///     assert!(sensor.sample().await?);
///     assert_eq!(handle.samples(), 2);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockMotionSensor {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    motion: AtomicBool,
    samples: AtomicU64,
}

impl MockMotionSensor {
    /// Create a sensor that initially senses nothing.
    pub fn new() -> (Self, MockMotionHandle) {
        let shared = Arc::new(Shared::default());
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MockMotionHandle { shared },
        )
    }
}

impl MotionSensor for MockMotionSensor {
    async fn sample(&mut self) -> Result<bool> {
        self.shared.samples.fetch_add(1, Ordering::Relaxed);
        Ok(self.shared.motion.load(Ordering::Relaxed))
    }
}

/// Control side of a [`MockMotionSensor`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MockMotionHandle {
    shared: Arc<Shared>,
}

impl MockMotionHandle {
    /// Set what the sensor reports from now on.
    pub fn set_motion(&self, motion: bool) {
        self.shared.motion.store(motion, Ordering::Relaxed);
    }

    /// Number of samples taken so far.
    pub fn samples(&self) -> u64 {
        self.shared.samples.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_level_follows_handle() {
        let (mut sensor, handle) = MockMotionSensor::new();

        handle.set_motion(true);
        assert!(sensor.sample().await.unwrap());
        assert!(sensor.sample().await.unwrap());

        handle.set_motion(false);
        assert!(!sensor.sample().await.unwrap());
        assert_eq!(handle.samples(), 3);
    }

    #[tokio::test]
    async fn test_cloned_handle_controls_same_sensor() {
        let (mut sensor, handle) = MockMotionSensor::new();
        let other = handle.clone();

        other.set_motion(true);

        assert!(sensor.sample().await.unwrap());
        assert_eq!(handle.samples(), 1);
    }
}
