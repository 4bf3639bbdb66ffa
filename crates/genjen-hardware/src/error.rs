//! Error types for hardware operations.
//!
//! This module defines error types specific to the panel's hardware
//! adapters: keypad, display, indicator LED, buzzer and motion sensor.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from or sent to a device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Returns `true` if the device is gone for good.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("Keypad");
        assert!(error.is_disconnected());
        assert_eq!(error.to_string(), "Device disconnected: Keypad");
    }

    #[test]
    fn test_communication_error() {
        let error = HardwareError::communication("bus stuck");
        assert!(matches!(error, HardwareError::CommunicationError { .. }));
        assert!(!error.is_disconnected());
        assert_eq!(error.to_string(), "Communication error: bus stuck");
    }

    #[test]
    fn test_invalid_data_error() {
        let error = HardwareError::invalid_data("row 7 out of range");
        assert_eq!(error.to_string(), "Invalid data: row 7 out of range");
    }
}
