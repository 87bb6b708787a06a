//! Canonical form for snapshot values.
//!
//! Canonicalization normalizes any JSON-compatible value into one
//! deterministic shape so that logically identical content always produces
//! identical bytes (and thus identical hashes):
//!
//! - Mapping keys sorted lexicographically at every nesting level
//! - `null` means "absent": entries and array elements that canonicalize
//!   to null are dropped (array removal shifts later indices)
//! - String values trimmed of surrounding whitespace
//! - Strings under address-like field names lowercased as `0x`-prefixed hex
//! - Strings under timestamp field names re-emitted as UTC ISO-8601
//! - Numeric `-0` normalized to integer `0`
//!
//! Non-finite numbers and unparsable timestamps are hard errors rather
//! than silent coercions.
//!
//! Key ordering relies on `serde_json`'s default BTreeMap-backed object
//! representation; the `preserve_order` feature must stay off.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use crate::error::{CanonicalError, Result};

/// Field names whose string values are normalized as chain addresses
/// (lowercase, `0x`-prefixed when the body is hex).
const ADDRESS_FIELDS: &[&str] = &[
    "address",
    "contractAddress",
    "tokenAddress",
    "implementation",
    "admin",
    "proxyImplementation",
    "proxyAdmin",
    "from",
    "to",
    "txHash",
    "blockHash",
];

/// Field names whose string values are parsed and re-emitted as UTC
/// ISO-8601 with millisecond precision.
const TIMESTAMP_FIELDS: &[&str] = &[
    "observedAt",
    "issuedAt",
    "expiresAt",
    "blockTimestamp",
    "scheduledAt",
    "executedAt",
    "createdAt",
    "publishedAt",
    "pinnedAt",
    "verifiedAt",
];

/// Helper for building JSON paths in error messages.
#[derive(Debug, Clone, Default)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self::default()
    }

    fn field(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    fn index(&self, i: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", i));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalize a value.
///
/// Pure and idempotent: `canonicalize(canonicalize(x)) == canonicalize(x)`.
/// A top-level value that canonicalizes to absent is returned as `null`.
pub fn canonicalize(value: &Value) -> Result<Value> {
    Ok(canonicalize_at(value, None, &Path::root())?.unwrap_or(Value::Null))
}

/// Serialize a value's canonical form as compact JSON.
///
/// Whitespace-free, keys already sorted; this is the exact byte stream the
/// content hash is computed over.
pub fn canonical_json(value: &Value) -> Result<String> {
    let canonical = canonicalize(value)?;
    serde_json::to_string(&canonical).map_err(|e| CanonicalError::Parse(e.to_string()))
}

/// Parse raw text and canonicalize the result.
pub fn canonicalize_text(text: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CanonicalError::Parse(e.to_string()))?;
    canonicalize(&value)
}

/// Recursive canonicalization. `None` means the value is absent and its
/// containing entry or element must be dropped.
fn canonicalize_at(value: &Value, key: Option<&str>, path: &Path) -> Result<Option<Value>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(Value::Bool(*b))),
        Value::Number(n) => canonicalize_number(n, path).map(Some),
        Value::String(s) => canonicalize_string(s, key, path).map(Some),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                if let Some(v) = canonicalize_at(item, None, &path.index(i))? {
                    out.push(v);
                }
            }
            Ok(Some(Value::Array(out)))
        }
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                if let Some(cv) = canonicalize_at(v, Some(k), &path.field(k))? {
                    out.insert(k.clone(), cv);
                }
            }
            Ok(Some(Value::Object(out)))
        }
    }
}

fn canonicalize_number(n: &Number, path: &Path) -> Result<Value> {
    if n.is_i64() || n.is_u64() {
        return Ok(Value::Number(n.clone()));
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                // Covers -0.0 as well; emit integer zero.
                Ok(Value::Number(Number::from(0u64)))
            } else {
                Ok(Value::Number(n.clone()))
            }
        }
        _ => Err(CanonicalError::NonFiniteNumber {
            path: path.to_string(),
        }),
    }
}

fn canonicalize_string(s: &str, key: Option<&str>, path: &Path) -> Result<Value> {
    let trimmed = s.trim();

    if let Some(key) = key {
        if ADDRESS_FIELDS.contains(&key) {
            return Ok(Value::String(normalize_address(trimmed)));
        }
        if TIMESTAMP_FIELDS.contains(&key) {
            return normalize_timestamp(trimmed, path).map(Value::String);
        }
    }

    Ok(Value::String(trimmed.to_string()))
}

/// Lowercase an address-like string and ensure a `0x` prefix when the body
/// is hex. Non-hex strings are only lowercased.
fn normalize_address(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let body = lower.strip_prefix("0x").unwrap_or(&lower);
    if !body.is_empty() && body.bytes().all(|b| b.is_ascii_hexdigit()) {
        format!("0x{}", body)
    } else {
        lower
    }
}

/// Parse a timestamp string and re-emit as UTC ISO-8601 with milliseconds.
fn normalize_timestamp(s: &str, path: &Path) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(s).map_err(|_| CanonicalError::BadTimestamp {
        path: path.to_string(),
        value: s.to_string(),
    })?;
    Ok(parsed
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonicalize_sorts_keys() {
        let value = json!({"b": 1, "a": {"z": 2, "y": 3}});
        let canonical = canonical_json(&value).unwrap();
        assert_eq!(canonical, r#"{"a":{"y":3,"z":2},"b":1}"#);
    }

    #[test]
    fn test_canonicalize_drops_nulls() {
        let value = json!({"a": null, "b": 1, "c": {"d": null}});
        let canonical = canonical_json(&value).unwrap();
        assert_eq!(canonical, r#"{"b":1,"c":{}}"#);
    }

    #[test]
    fn test_canonicalize_drops_null_array_elements() {
        // Index-shifting removal is deliberate; see module docs.
        let value = json!([1, null, 2]);
        let canonical = canonical_json(&value).unwrap();
        assert_eq!(canonical, "[1,2]");
    }

    #[test]
    fn test_canonicalize_trims_strings() {
        let value = json!({"name": "  Token  "});
        let canonical = canonicalize(&value).unwrap();
        assert_eq!(canonical, json!({"name": "Token"}));
    }

    #[test]
    fn test_canonicalize_normalizes_addresses() {
        let value = json!({"contractAddress": " 0xAbCd1234 ", "tokenAddress": "DEADBEEF"});
        let canonical = canonicalize(&value).unwrap();
        assert_eq!(
            canonical,
            json!({"contractAddress": "0xabcd1234", "tokenAddress": "0xdeadbeef"})
        );
    }

    #[test]
    fn test_canonicalize_address_non_hex_only_lowercased() {
        let value = json!({"address": "Not-An-Address"});
        let canonical = canonicalize(&value).unwrap();
        assert_eq!(canonical, json!({"address": "not-an-address"}));
    }

    #[test]
    fn test_canonicalize_normalizes_timestamps() {
        let value = json!({"observedAt": "2024-06-01T12:00:00+02:00"});
        let canonical = canonicalize(&value).unwrap();
        assert_eq!(canonical, json!({"observedAt": "2024-06-01T10:00:00.000Z"}));
    }

    #[test]
    fn test_canonicalize_rejects_bad_timestamp() {
        let value = json!({"observedAt": "yesterday"});
        let err = canonicalize(&value).unwrap_err();
        assert!(matches!(err, CanonicalError::BadTimestamp { .. }));
        assert!(err.to_string().contains("observedAt"));
    }

    #[test]
    fn test_canonicalize_negative_zero() {
        let value = json!({"n": -0.0});
        let canonical = canonical_json(&value).unwrap();
        assert_eq!(canonical, r#"{"n":0}"#);
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let value = json!({
            "observedAt": "2024-06-01T12:00:00+02:00",
            "contractAddress": "0xABC123",
            "nested": {"b": [1, null, " x "], "a": -0.0}
        });
        let once = canonicalize(&value).unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonicalize_text_rejects_garbage() {
        let err = canonicalize_text("{not json").unwrap_err();
        assert!(matches!(err, CanonicalError::Parse(_)));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"x":1,"y":{"p":2,"q":3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y":{"q":3,"p":2},"x":1}"#).unwrap();
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
    }
}
