//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Tally
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TallyError {
    /// No network reachable; detected before any remote call.
    #[error("Network error: {0}")]
    Network(String),

    /// API token empty or rejected by the remote service.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The remote service answered with a failure.
    #[error("API error: {0}")]
    Api(String),

    /// Free-text input (e.g. a time span) could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The evaluation was superseded by a newer keystroke.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Settings are missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything that should never surface to the user as-is.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Tally operations
pub type Result<T> = std::result::Result<T, TallyError>;
