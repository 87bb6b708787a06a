//! Error types for the watch module.

use thiserror::Error;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation would overwrite or contradict committed state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backend failure (I/O, serialization, connection).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by evidence sources.
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// The source could not be reached or answered with garbage.
    #[error("evidence source error: {0}")]
    Source(String),
}

/// Errors surfaced by notifiers.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Everything that can go wrong inside a single watch check.
///
/// These never escape the runner: each is captured into the run record
/// so one broken project cannot halt a polling sweep.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The project has never published, so there is nothing to compare to.
    #[error("No published snapshot to compare against")]
    NoBaseline,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    #[error(transparent)]
    Canonical(#[from] verisnap_core::CanonicalError),
}
