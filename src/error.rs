//! Error types for the registration flow.

/// Top-level error type for wiring and running a session.
///
/// `ApiError` and `NavigationError` never reach it: the step controllers
/// turn them into outcomes and notifications.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Key-value persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read store at {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to write store at {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by calls to the registration backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {path} failed: {reason}")]
    Request { path: String, reason: String },

    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("Failed to parse response from {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Errors raised when moving between steps of the flow.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("Cannot navigate to {step}: {reason}")]
    Failed { step: String, reason: String },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
