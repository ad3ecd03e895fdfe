//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// A workout day that cannot be turned into a session
    #[error("Malformed day '{day_id}': {reason}")]
    MalformedDay { day_id: String, reason: String },

    /// Operation invoked on a session that can no longer accept it
    #[error("Invalid transition: {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: crate::SessionState,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}
