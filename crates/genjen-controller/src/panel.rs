//! Panel output: the 16x2 display and the indicator LED.
//!
//! Row 0 shows the mode label, row 1 the digits typed so far. The
//! indicator shows the mode color.

use genjen_core::Indication;
use genjen_core::constants::{INPUT_ROW, MODE_ROW, MSG_STARTUP};
use genjen_hardware::traits::{DisplayDevice, IndicatorDevice};
use genjen_hardware::Result;

/// Display and indicator, owned together by the controller task.
#[derive(Debug)]
pub struct Panel<D, I> {
    display: D,
    indicator: I,
}

impl<D, I> Panel<D, I>
where
    D: DisplayDevice,
    I: IndicatorDevice,
{
    pub fn new(display: D, indicator: I) -> Self {
        Self { display, indicator }
    }

    /// Show the startup banner with an empty input row.
    pub async fn show_startup(&mut self) -> Result<()> {
        self.display.render_line(MSG_STARTUP, MODE_ROW).await?;
        self.display.render_line("", INPUT_ROW).await
    }

    /// Show the indication for a raw mode value.
    ///
    /// Values that are not a known mode show "Invalid state".
    pub async fn show_mode(&mut self, raw_mode: u8) -> Result<()> {
        let Indication { label, color } = Indication::for_raw(raw_mode);
        let (red, green, blue) = color;

        self.indicator.set_indicator(red, green, blue).await?;
        self.display.render_line(label, MODE_ROW).await
    }

    /// Show the digits typed so far.
    pub async fn show_input(&mut self, digits: &str) -> Result<()> {
        self.display.render_line(digits, INPUT_ROW).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genjen_core::SecurityMode;
    use genjen_hardware::mock::{MockDisplay, MockIndicator};
    use rstest::rstest;

    #[rstest]
    #[case(SecurityMode::Armed.to_u8(), "Aktiveret", (50, 50, 0))]
    #[case(SecurityMode::Disarmed.to_u8(), "Deaktiveret", (0, 50, 0))]
    #[case(SecurityMode::Alarm.to_u8(), "Alarm", (50, 0, 0))]
    #[case(3, "Invalid state", (0, 0, 50))]
    #[case(200, "Invalid state", (0, 0, 50))]
    #[tokio::test]
    async fn test_show_mode(#[case] raw: u8, #[case] label: &str, #[case] color: (u8, u8, u8)) {
        let (display, display_handle) = MockDisplay::new();
        let (indicator, indicator_handle) = MockIndicator::new();
        let mut panel = Panel::new(display, indicator);

        panel.show_mode(raw).await.unwrap();

        assert_eq!(display_handle.line(0).trim_end(), label);
        assert_eq!(indicator_handle.color(), color);
    }

    #[tokio::test]
    async fn test_show_startup_and_input() {
        let (display, display_handle) = MockDisplay::new();
        let (indicator, _indicator_handle) = MockIndicator::new();
        let mut panel = Panel::new(display, indicator);

        panel.show_input("1234").await.unwrap();
        panel.show_startup().await.unwrap();

        assert_eq!(display_handle.line(0).trim_end(), "Program start");
        assert_eq!(display_handle.line(1).trim_end(), "");

        panel.show_input("12").await.unwrap();
        assert_eq!(display_handle.line(1).trim_end(), "12");
    }
}
