//! Error types for the Weft binding pipeline.
//!
//! All crates return `WeftResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the Weft pipeline.
#[derive(Debug, Error)]
pub enum WeftError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A map invariant was violated (e.g., an index permutation left a
    /// map unsorted or out of bounds).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for `Result<T, WeftError>`.
pub type WeftResult<T> = Result<T, WeftError>;
