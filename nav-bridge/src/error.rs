use thiserror::Error;

use nav_stream::TransportError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every listener registration was refused
    #[error("Listener registration failed: {0}")]
    Registration(#[from] TransportError),

    #[error("Unknown test sample: {0}")]
    UnknownSample(String),

    #[error("Invalid configuration JSON: {0}")]
    ConfigParse(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
