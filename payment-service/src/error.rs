//! Error types for the payment service

use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors; all of them surface to callers as `status: error`
#[derive(Error, Debug)]
pub enum Error {
    /// A backing component is unreachable or failed
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// No payer snapshot available for the user
    #[error("Missing user context for {0}")]
    MissingContext(String),

    /// Configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<fraud_intel::Error> for Error {
    fn from(err: fraud_intel::Error) -> Self {
        Error::Dependency(err.to_string())
    }
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::Dependency(err.to_string())
    }
}
