//! Watch field extraction and risk classification.
//!
//! A snapshot carries far more than the watcher cares about. Change
//! detection looks only at a small set of security-relevant fields, so
//! churn in block numbers, timestamps, and evidence blobs never triggers
//! a republish.

use serde_json::{Map, Value};

/// The fields the watcher compares, as `(name, JSON pointer)` pairs.
///
/// Names are the flat keys reported in run records; pointers address the
/// `value` leaf of the corresponding snapshot field.
pub const WATCH_FIELDS: &[(&str, &str)] = &[
    ("proxyImplementation", "/proxy/implementation/value"),
    ("proxyAdmin", "/proxy/admin/value"),
    ("totalSupply", "/token/totalSupply/value"),
    ("isVerified", "/verification/isVerified/value"),
    ("abiAvailable", "/verification/abiAvailable/value"),
    ("sourceAvailable", "/verification/sourceAvailable/value"),
];

/// Project the watch field subset out of full snapshot content.
///
/// Fields absent from the snapshot are left out of the result entirely, so
/// a field appearing or disappearing reads as a change.
pub fn extract_watch_fields(content: &Value) -> Value {
    let mut fields = Map::new();
    for (name, pointer) in WATCH_FIELDS {
        if let Some(value) = content.pointer(pointer) {
            if !value.is_null() {
                fields.insert((*name).to_string(), value.clone());
            }
        }
    }
    Value::Object(fields)
}

/// Decide whether a snapshot describes a contract whose state can still be
/// changed by someone.
///
/// Prefers the derived flags when the snapshot carries them; otherwise
/// falls back to the raw proxy observations. A conflicted verification
/// status also counts: disagreement between sources is itself a risk.
pub fn risk_override(content: &Value) -> bool {
    for pointer in [
        "/derived/riskOverride/value",
        "/derived/isUpgradeable/value",
        "/derived/hasAdminPowers/value",
    ] {
        if content.pointer(pointer) == Some(&Value::Bool(true)) {
            return true;
        }
    }

    for pointer in ["/proxy/implementation/value", "/proxy/admin/value"] {
        if matches!(content.pointer(pointer), Some(v) if !v.is_null()) {
            return true;
        }
    }

    content.pointer("/verification/isVerified/status").and_then(Value::as_str)
        == Some("conflict")
}
