//! Core records: projects, snapshots, watch runs, and stored diffs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use verisnap_core::DiffEntry;

/// Derive a default project slug from a network name and contract address.
///
/// `base-a1b2c3-d4e5` style: recognizable at a glance, unique enough in
/// practice, and stable because the address is lowercased first. Callers
/// supplying their own slug bypass this entirely.
pub fn default_slug(network: &str, contract_address: &str) -> String {
    let normalized = contract_address.to_ascii_lowercase();
    let body = normalized.strip_prefix("0x").unwrap_or(&normalized);
    let head = body.get(..6).unwrap_or(body);
    let tail = body.get(body.len().saturating_sub(4)..).unwrap_or("");
    format!("{}-{}-{}", network, head, tail)
}

/// A tracked contract, identified by its slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub slug: String,
    pub chain_id: u64,
    pub token_address: String,
    pub display_name: Option<String>,
    /// Whether the background watcher polls this project.
    pub watch_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a snapshot version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Draft,
    Published,
}

/// One versioned snapshot of a project's observed state.
///
/// `content` is stored already canonicalized, and `content_hash` is the
/// Keccak-256 of its compact canonical JSON. Identity is `(slug, version)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub slug: String,
    pub version: u32,
    pub status: SnapshotStatus,
    pub content: Value,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Outcome of a watch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The run is in flight. Inserted before any work happens so a crash
    /// mid-run leaves a visible trace instead of silence.
    Running,
    /// A change was detected and a new version was published.
    Success,
    /// The fresh observation matched the published snapshot.
    NoChange,
    /// The check failed; see `error`.
    Error,
}

/// Audit record of one watch check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRun {
    pub id: u64,
    pub slug: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    /// Version published by this run, when `status` is `Success`.
    pub new_version: Option<u32>,
    /// Watch field names that changed, when `status` is `Success`.
    pub changed_fields: Vec<String>,
}

/// A stored structural diff between two published versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRecord {
    pub slug: String,
    pub from_version: u32,
    pub to_version: u32,
    pub entries: Vec<DiffEntry>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slug_shape() {
        assert_eq!(
            default_slug("base", "0xAbCd001122334455667788990011223344556677"),
            "base-abcd00-6677"
        );
    }

    #[test]
    fn test_default_slug_tolerates_odd_input() {
        assert_eq!(default_slug("base", "0xab"), "base-ab-ab");
        assert_eq!(default_slug("base", ""), "base--");
    }
}
