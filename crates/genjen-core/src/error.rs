use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Domain errors
    #[error("Invalid secret code: {0}")]
    InvalidCode(String),

    #[error("Invalid security mode value: {0}")]
    InvalidMode(u8),

    #[error("Invalid key: {0:?}")]
    InvalidKey(char),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
