//! Mock character display.
//!
//! Keeps the rendered rows in memory and publishes them through a
//! `watch` channel so tests can inspect or await the panel contents.

use genjen_core::constants::{DISPLAY_COLUMNS, DISPLAY_ROWS};
use tokio::sync::watch;

use crate::{HardwareError, Result, fit_line, traits::DisplayDevice};

/// In-memory display with `rows` x `columns` characters.
///
/// # Examples
///
/// ```
/// use genjen_hardware::mock::MockDisplay;
/// use genjen_hardware::traits::DisplayDevice;
///
/// #[tokio::main]
/// async fn main() -> genjen_hardware::Result<()> {
///     let (mut display, handle) = MockDisplay::new();
///
///     display.render_line("Aktiveret", 0).await?;
///     assert_eq!(handle.line(0).trim_end(), "Aktiveret");
///     assert_eq!(handle.line(0).len(), 16);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDisplay {
    columns: usize,
    rows_tx: watch::Sender<Vec<String>>,
}

impl MockDisplay {
    /// Create a 16x2 mock display.
    pub fn new() -> (Self, MockDisplayHandle) {
        Self::with_size(DISPLAY_ROWS, DISPLAY_COLUMNS)
    }

    /// Create a mock display with custom dimensions.
    pub fn with_size(rows: usize, columns: usize) -> (Self, MockDisplayHandle) {
        let (rows_tx, rows_rx) = watch::channel(vec![" ".repeat(columns); rows]);
        (Self { columns, rows_tx }, MockDisplayHandle { rows_rx })
    }
}

impl DisplayDevice for MockDisplay {
    async fn render_line(&mut self, text: &str, row: usize) -> Result<()> {
        let line = fit_line(text, self.columns);
        let mut result = Ok(());
        self.rows_tx.send_modify(|rows| match rows.get_mut(row) {
            Some(slot) => *slot = line,
            None => {
                result = Err(HardwareError::invalid_data(format!(
                    "Display row {} out of range (rows: {})",
                    row,
                    rows.len()
                )))
            }
        });
        result
    }
}

/// Read side of a [`MockDisplay`].
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    rows_rx: watch::Receiver<Vec<String>>,
}

impl MockDisplayHandle {
    /// Current content of `row`, blank-padded. Empty if the row does not exist.
    pub fn line(&self, row: usize) -> String {
        self.rows_rx.borrow().get(row).cloned().unwrap_or_default()
    }

    /// Current content of every row.
    pub fn lines(&self) -> Vec<String> {
        self.rows_rx.borrow().clone()
    }

    /// Wait until `row` (trimmed) equals `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the display is dropped first.
    pub async fn wait_for_line(&mut self, row: usize, text: &str) -> Result<()> {
        self.rows_rx
            .wait_for(|rows| rows.get(row).is_some_and(|line| line.trim_end() == text))
            .await
            .map(|_| ())
            .map_err(|_| HardwareError::disconnected("Display dropped"))
    }
}
