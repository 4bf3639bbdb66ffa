//! Display, indicator and buzzer that report through `tracing`.

use std::time::Duration;

use genjen_core::constants::{DISPLAY_COLUMNS, DISPLAY_ROWS};
use tracing::{debug, info};

use crate::traits::{DisplayDevice, IndicatorDevice, ToneDevice};
use crate::{HardwareError, Result, fit_line};

/// Display that logs every row it renders.
#[derive(Debug)]
pub struct ConsoleDisplay {
    rows: Vec<String>,
    columns: usize,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self {
            rows: vec![" ".repeat(DISPLAY_COLUMNS); DISPLAY_ROWS],
            columns: DISPLAY_COLUMNS,
        }
    }

    /// Current rows, blank-padded.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayDevice for ConsoleDisplay {
    async fn render_line(&mut self, text: &str, row: usize) -> Result<()> {
        let line = fit_line(text, self.columns);
        let slot = self.rows.get_mut(row).ok_or_else(|| {
            HardwareError::invalid_data(format!("Display row {} out of range", row))
        })?;

        // Repeated refreshes of the same content are only interesting at debug.
        if *slot == line {
            debug!(row, text = %line.trim_end(), "Display row unchanged");
        } else {
            info!(row, text = %line.trim_end(), "Display");
        }
        *slot = line;
        Ok(())
    }
}

/// Indicator that logs color changes.
#[derive(Debug, Default)]
pub struct ConsoleIndicator {
    color: Option<(u8, u8, u8)>,
}

impl ConsoleIndicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndicatorDevice for ConsoleIndicator {
    async fn set_indicator(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        if self.color != Some((red, green, blue)) {
            info!(red, green, blue, "Indicator");
            self.color = Some((red, green, blue));
        }
        Ok(())
    }
}

/// Buzzer that logs each tone and holds for its duration.
#[derive(Debug, Default)]
pub struct ConsoleBuzzer;

impl ConsoleBuzzer {
    pub fn new() -> Self {
        Self
    }
}

impl ToneDevice for ConsoleBuzzer {
    async fn emit_tone(&mut self, pitch_hz: u16, duration: Duration) -> Result<()> {
        debug!(pitch_hz, duration_ms = duration.as_millis() as u64, "Tone");
        tokio::time::sleep(duration).await;
        Ok(())
    }
}
