//! Motion debounce.

use genjen_core::constants::MOTION_THRESHOLD;

/// Counter that turns noisy motion samples into a single alarm trigger.
///
/// A positive sample counts up, a negative one counts down, never below
/// zero. When the count reaches the threshold it resets to zero and
/// [`record`](Self::record) reports the trigger.
///
/// # Examples
///
/// ```
/// use genjen_controller::MotionAccumulator;
///
/// let mut acc = MotionAccumulator::new(3);
///
/// assert!(!acc.record(true));
/// assert!(!acc.record(false));
/// assert!(!acc.record(true));
/// assert!(!acc.record(true));
/// assert!(acc.record(true));
/// assert_eq!(acc.count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionAccumulator {
    count: u32,
    threshold: u32,
}

impl MotionAccumulator {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
        }
    }

    /// Record one sample. Returns `true` when the threshold is reached.
    pub fn record(&mut self, motion: bool) -> bool {
        if motion {
            self.count += 1;
        } else {
            self.count = self.count.saturating_sub(1);
        }

        if self.count >= self.threshold {
            self.count = 0;
            return true;
        }
        false
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl Default for MotionAccumulator {
    fn default() -> Self {
        Self::new(MOTION_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_at_zero() {
        let mut acc = MotionAccumulator::default();

        assert!(!acc.record(false));
        assert!(!acc.record(false));

        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn test_default_threshold_triggers_on_hundredth_sample() {
        let mut acc = MotionAccumulator::default();

        for _ in 0..99 {
            assert!(!acc.record(true));
        }
        assert_eq!(acc.count(), 99);

        assert!(acc.record(true));
        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn test_negative_samples_delay_trigger() {
        let mut acc = MotionAccumulator::new(10);

        for _ in 0..9 {
            acc.record(true);
        }
        acc.record(false);
        acc.record(false);
        assert_eq!(acc.count(), 7);

        assert!(!acc.record(true));
        assert!(!acc.record(true));
        assert!(acc.record(true));
    }

    #[test]
    fn test_reset() {
        let mut acc = MotionAccumulator::new(10);
        acc.record(true);
        acc.reset();
        assert_eq!(acc.count(), 0);
    }
}
