//! Structural diff between two canonical values.
//!
//! The diff walks the sorted union of mapping keys and sequence indices and
//! emits one change record per diverging leaf path. A type change at a path
//! (object replaced by scalar, array by object, ...) is recorded once at
//! that path without recursing further.
//!
//! Canonical form contains no nulls, so `Value::Null` in a change record
//! unambiguously means "absent on this side".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::canonicalize;
use crate::error::Result;

/// A single leaf-level change between two values.
///
/// `path` uses dot/bracket notation, e.g. `token.totalSupply` or
/// `logs[0].address`. An empty path means the values diverge at the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub path: String,
    pub before: Value,
    pub after: Value,
}

/// Diff two arbitrary values.
///
/// Both sides are canonicalized first, so `diff(x, y)` is non-empty exactly
/// when `canonicalize(x) != canonicalize(y)`, and `diff(x, x)` is always
/// empty. Output ordering is deterministic for identical inputs.
pub fn diff(before: &Value, after: &Value) -> Result<Vec<DiffEntry>> {
    let a = canonicalize(before)?;
    let b = canonicalize(after)?;
    Ok(diff_canonical(&a, &b))
}

/// Diff two values that are already in canonical form.
pub fn diff_canonical(before: &Value, after: &Value) -> Vec<DiffEntry> {
    let mut changes = Vec::new();
    walk("", before, after, &mut changes);
    changes
}

fn walk(path: &str, a: &Value, b: &Value, changes: &mut Vec<DiffEntry>) {
    if a == b {
        return;
    }

    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => {
            let keys: BTreeSet<&String> = ma.keys().chain(mb.keys()).collect();
            for key in keys {
                let child = if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", path, key)
                };
                let av = ma.get(key.as_str()).unwrap_or(&Value::Null);
                let bv = mb.get(key.as_str()).unwrap_or(&Value::Null);
                walk(&child, av, bv, changes);
            }
        }
        (Value::Array(va), Value::Array(vb)) => {
            let len = va.len().max(vb.len());
            for i in 0..len {
                let child = format!("{}[{}]", path, i);
                let av = va.get(i).unwrap_or(&Value::Null);
                let bv = vb.get(i).unwrap_or(&Value::Null);
                walk(&child, av, bv, changes);
            }
        }
        _ => {
            changes.push(DiffEntry {
                path: path.to_string(),
                before: a.clone(),
                after: b.clone(),
            });
        }
    }
}
