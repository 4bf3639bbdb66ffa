//! Error types for the controller tasks.

use genjen_hardware::HardwareError;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Errors that end a controller task.
///
/// Transient adapter failures are logged and retried by the task loops;
/// only errors that make further progress impossible surface here.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// An adapter failed in a way the task cannot recover from.
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// The other end of an internal channel is gone.
    #[error("Channel closed: {channel}")]
    ChannelClosed { channel: &'static str },
}

impl ControllerError {
    pub fn channel_closed(channel: &'static str) -> Self {
        Self::ChannelClosed { channel }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_closed_display() {
        let error = ControllerError::channel_closed("requests");
        assert_eq!(error.to_string(), "Channel closed: requests");
    }

    #[test]
    fn test_from_hardware_error() {
        let error: ControllerError = HardwareError::disconnected("Keypad").into();
        assert!(matches!(error, ControllerError::Hardware(_)));
    }
}
