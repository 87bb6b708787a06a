//! Snapshot verification: recompute a content hash and classify the result.
//!
//! The classification is deliberately tri-state. "The candidate does not
//! parse" and "the candidate parses but hashes differently" are different
//! facts and must never be collapsed into one another.

use serde_json::Value;
use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_json, canonicalize};
use crate::digest::ContentHash;

/// Outcome classification for a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyStatus {
    /// Recomputed hash matches the stored hash.
    Valid,
    /// Candidate canonicalizes fine but hashes differently.
    Invalid,
    /// Candidate failed to parse or canonicalize.
    Error,
}

/// Result of verifying a candidate value against a stored hash.
///
/// The recomputed hash and canonical serialization are returned whenever
/// they could be computed, regardless of outcome, so callers can display
/// them as audit evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub status: VerifyStatus,
    pub computed_hash: Option<String>,
    pub canonical_json: Option<String>,
    pub error: Option<String>,
}

/// Verify an already-parsed value against a stored hash string.
///
/// The stored hash is normalized (trim, case, optional `0x` prefix) before
/// comparison. No side effects.
pub fn verify_value(value: &Value, stored_hash: &str) -> VerifyOutcome {
    let canonical = match canonicalize(value) {
        Ok(v) => v,
        Err(e) => {
            return VerifyOutcome {
                status: VerifyStatus::Error,
                computed_hash: None,
                canonical_json: None,
                error: Some(e.to_string()),
            }
        }
    };

    // The canonical value serializes infallibly; go through canonical_json
    // so the emitted evidence is byte-identical to what was hashed.
    let json = match canonical_json(&canonical) {
        Ok(j) => j,
        Err(e) => {
            return VerifyOutcome {
                status: VerifyStatus::Error,
                computed_hash: None,
                canonical_json: None,
                error: Some(e.to_string()),
            }
        }
    };
    let computed = ContentHash::hash(json.as_bytes());

    let status = match ContentHash::from_hex(stored_hash) {
        Ok(stored) if stored == computed => VerifyStatus::Valid,
        _ => VerifyStatus::Invalid,
    };

    VerifyOutcome {
        status,
        computed_hash: Some(computed.to_hex()),
        canonical_json: Some(json),
        error: None,
    }
}

/// Verify raw JSON text against a stored hash string.
pub fn verify_text(text: &str, stored_hash: &str) -> VerifyOutcome {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => verify_value(&value, stored_hash),
        Err(e) => VerifyOutcome {
            status: VerifyStatus::Error,
            computed_hash: None,
            canonical_json: None,
            error: Some(format!("invalid JSON: {}", e)),
        },
    }
}
