//! Evidence source seam.
//!
//! The watcher never talks to chains or explorers itself; something that
//! already knows how to observe a contract is injected behind this trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::EvidenceError;
use crate::types::Project;

/// Produces a fresh observation of a project's on-chain state.
///
/// The returned value is raw snapshot content; the runner canonicalizes
/// and hashes it before storing.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    async fn observe(&self, project: &Project) -> Result<Value, EvidenceError>;
}
