//! Error types for the fitlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitlog_core operations
///
/// Only the storage and configuration layers produce errors. Malformed user
/// input never does: calculators degrade to defaults or return `None`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input the caller asked to be rejected outright (e.g. a malformed date key)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
