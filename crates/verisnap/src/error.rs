//! Error types for the Service.

use thiserror::Error;
use verisnap_claims::{ClaimError, RecoverError};
use verisnap_core::CanonicalError;
use verisnap_limit::RateLimitError;
use verisnap_watch::{EvidenceError, StoreError};

/// Errors that can occur during Service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Canonicalization error.
    #[error("canonicalization error: {0}")]
    Canonical(#[from] CanonicalError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Evidence observation error.
    #[error("evidence error: {0}")]
    Evidence(#[from] EvidenceError),

    /// Claim token error.
    #[error("claim error: {0}")]
    Claim(#[from] ClaimError),

    /// Signer recovery error.
    #[error("signature recovery error: {0}")]
    Recover(#[from] RecoverError),

    /// Rate limit rejection.
    #[error("rate limited: {0}")]
    RateLimited(#[from] RateLimitError),

    /// Project not found.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// Snapshot not found.
    #[error("snapshot not found: {slug} v{version}")]
    SnapshotNotFound { slug: String, version: u32 },

    /// A valid claim token that authorizes a different publish action.
    #[error("claim does not authorize this publish: {0}")]
    ClaimMismatch(String),
}

/// Result type for Service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
