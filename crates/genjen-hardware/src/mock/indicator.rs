//! Mock tri-color indicator.

use tokio::sync::watch;

use crate::{HardwareError, Result, traits::IndicatorDevice};

/// Indicator LED that remembers its last color.
///
/// # Examples
///
/// ```
/// use genjen_hardware::mock::MockIndicator;
/// use genjen_hardware::traits::IndicatorDevice;
///
/// #[tokio::main]
/// async fn main() -> genjen_hardware::Result<()> {
///     let (mut led, handle) = MockIndicator::new();
///
///     led.set_indicator(0, 50, 0).await?;
///     assert_eq!(handle.color(), (0, 50, 0));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockIndicator {
    color_tx: watch::Sender<(u8, u8, u8)>,
}

impl MockIndicator {
    /// Create a mock indicator, initially off.
    pub fn new() -> (Self, MockIndicatorHandle) {
        let (color_tx, color_rx) = watch::channel((0, 0, 0));
        (Self { color_tx }, MockIndicatorHandle { color_rx })
    }
}

impl IndicatorDevice for MockIndicator {
    async fn set_indicator(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        self.color_tx.send_replace((red, green, blue));
        Ok(())
    }
}

/// Read side of a [`MockIndicator`].
#[derive(Debug, Clone)]
pub struct MockIndicatorHandle {
    color_rx: watch::Receiver<(u8, u8, u8)>,
}

impl MockIndicatorHandle {
    /// Last color written, as (red, green, blue).
    pub fn color(&self) -> (u8, u8, u8) {
        *self.color_rx.borrow()
    }

    /// Wait until the indicator shows `color`.
    ///
    /// # Errors
    ///
    /// Returns an error if the indicator is dropped first.
    pub async fn wait_for_color(&mut self, color: (u8, u8, u8)) -> Result<()> {
        self.color_rx
            .wait_for(|current| *current == color)
            .await
            .map(|_| ())
            .map_err(|_| HardwareError::disconnected("Indicator dropped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initially_off() {
        let (_led, handle) = MockIndicator::new();
        assert_eq!(handle.color(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_last_color_wins() {
        let (mut led, handle) = MockIndicator::new();

        led.set_indicator(50, 50, 0).await.unwrap();
        led.set_indicator(50, 0, 0).await.unwrap();

        assert_eq!(handle.color(), (50, 0, 0));
    }
}
