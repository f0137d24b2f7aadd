//! Error types for the bridge core
//!
//! Provides unified error handling using thiserror. Value coercion has no
//! error path: a string that no recognizer accepts simply stays raw.

use thiserror::Error;

// == Bridge Error Enum ==
/// Unified error type for the eviction cache and parameter binding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Caller misuse: blank key, unknown SQL type name, malformed config
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The scheduler collaborator could not arm an expiry timer
    #[error("Scheduling failure: {0}")]
    SchedulingFailure(String),
}

// == Result Type Alias ==
/// Convenience Result type for the bridge core.
pub type Result<T> = std::result::Result<T, BridgeError>;
