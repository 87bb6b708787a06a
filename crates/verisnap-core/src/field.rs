//! Tagged evidence fields consumed from the analysis collaborators.
//!
//! Every fact in a snapshot carries its truth status and where it came
//! from. The core treats snapshot payloads as opaque values; these types
//! describe the shape the ingestion boundary produces.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How confident the evidence source is in a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruthStatus {
    Yes,
    No,
    Unknown,
    /// Sources disagree; raises monitoring priority downstream.
    Conflict,
}

/// Which collaborator produced a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Chain,
    Basescan,
    Sourcify,
    Builder,
    Derived,
}

/// A single evidence field: a value plus its status and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotField<T> {
    pub value: T,
    pub status: TruthStatus,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
}

impl<T> SnapshotField<T> {
    /// A field derived by this system rather than observed.
    pub fn derived(value: T) -> Self {
        Self {
            value,
            status: TruthStatus::Yes,
            provenance: Provenance::Derived,
            evidence: None,
        }
    }
}
