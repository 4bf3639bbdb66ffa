//! Controller configuration.
//!
//! Every field has a default matching the stock panel, so an
//! empty JSON object (or no configuration file at all) yields a working
//! controller.
//!
//! ```
//! use genjen_core::ControllerConfig;
//!
//! let config = ControllerConfig::from_json(r#"{ "tick_ms": 10 }"#).unwrap();
//! assert_eq!(config.tick_ms, 10);
//! assert_eq!(config.motion_threshold, 100);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TICK_MS, DEFAULT_TONE_QUEUE_CAPACITY, MAX_INPUT_LENGTH, MOTION_THRESHOLD,
};
use crate::{CodeTable, Error, Result};

/// Configuration for the controller tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Length of one scheduling tick in milliseconds.
    pub tick_ms: u64,

    /// Net positive motion samples needed to raise the alarm.
    pub motion_threshold: u32,

    /// Maximum digits held by the input buffer.
    pub max_input_len: usize,

    /// Capacity of the tone request queue.
    pub tone_queue_capacity: usize,

    /// Secret codes.
    pub codes: CodeTable,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            motion_threshold: MOTION_THRESHOLD,
            max_input_len: MAX_INPUT_LENGTH,
            tone_queue_capacity: DEFAULT_TONE_QUEUE_CAPACITY,
            codes: CodeTable::default(),
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    /// Returns `Error::ConfigParse` for malformed JSON or bad codes, and
    /// `Error::Config` if validation fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, otherwise the same
    /// errors as [`from_json`](Self::from_json).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that the values can drive a working controller.
    ///
    /// # Errors
    /// Returns `Error::Config` if:
    /// - `tick_ms`, `motion_threshold`, `max_input_len` or
    ///   `tone_queue_capacity` is zero
    /// - a secret code is longer than `max_input_len` (it could never be typed)
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(Error::Config("tick_ms must be greater than 0".to_string()));
        }
        if self.motion_threshold == 0 {
            return Err(Error::Config(
                "motion_threshold must be greater than 0".to_string(),
            ));
        }
        if self.max_input_len == 0 {
            return Err(Error::Config(
                "max_input_len must be greater than 0".to_string(),
            ));
        }
        if self.tone_queue_capacity == 0 {
            return Err(Error::Config(
                "tone_queue_capacity must be greater than 0".to_string(),
            ));
        }
        if self.codes.longest() > self.max_input_len {
            return Err(Error::Config(format!(
                "secret codes must fit in {} digits",
                self.max_input_len
            )));
        }
        Ok(())
    }

    /// Scheduling tick as a `Duration`.
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Duration of `ticks` scheduling ticks.
    #[must_use]
    pub fn ticks(&self, ticks: u32) -> Duration {
        self.tick() * ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entry, SecurityMode};
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ControllerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick(), Duration::from_millis(15));
        assert_eq!(config.ticks(10), Duration::from_millis(150));
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ControllerConfig::from_json("{}").unwrap();
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn test_custom_codes() {
        let json = r#"{ "codes": { "disarm": "4711", "arm": "1", "stop_alarm": "2" } }"#;
        let config = ControllerConfig::from_json(json).unwrap();
        let entry = Entry::new("4711").unwrap();
        assert_eq!(config.codes.lookup(&entry), Some(SecurityMode::Disarmed));
    }

    #[test]
    fn test_zero_tick_rejected() {
        let result = ControllerConfig::from_json(r#"{ "tick_ms": 0 }"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_code_longer_than_buffer_rejected() {
        let json = r#"{ "max_input_len": 2 }"#;
        let result = ControllerConfig::from_json(json);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = ControllerConfig::from_json("{ tick_ms: }");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "motion_threshold": 50 }}"#).unwrap();

        let config = ControllerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.motion_threshold, 50);
    }

    #[test]
    fn test_from_missing_file() {
        let result = ControllerConfig::from_file("/nonexistent/genjen.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
