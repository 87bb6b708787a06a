//! Error types for VeriSnap core.

use thiserror::Error;

/// Errors that can occur during canonicalization.
///
/// These are hard data errors, not transient failures. A value that fails
/// canonicalization cannot be hashed, diffed, or stored.
#[derive(Debug, Error)]
pub enum CanonicalError {
    /// A number that is not representable (NaN or infinity).
    #[error("non-finite number at {path}")]
    NonFiniteNumber { path: String },

    /// A string under a timestamp field that does not parse as a timestamp.
    #[error("unparsable timestamp at {path}: {value:?}")]
    BadTimestamp { path: String, value: String },

    /// Input text was not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CanonicalError>;
