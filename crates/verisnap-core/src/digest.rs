//! Content hashing over canonical form.
//!
//! `hash = Keccak256(UTF8(compact_json(canonicalize(value))))`, rendered as
//! lowercase `0x`-hex. Keccak-256 keeps the digest compatible with the
//! Ethereum tooling that consumes these hashes.

use serde_json::Value;
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::canonical::canonical_json;
use crate::error::Result;

/// A 32-byte Keccak-256 content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Compute the Keccak-256 hash of raw bytes.
    pub fn hash(data: &[u8]) -> Self {
        let digest = Keccak256::digest(data);
        Self(digest.into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as lowercase `0x`-prefixed hex (66 characters).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, accepting an optional `0x` prefix and mixed case.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        let body = s.trim().strip_prefix("0x").unwrap_or_else(|| s.trim());
        let bytes = hex::decode(body)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..18])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for ContentHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Hash a value's canonical form.
///
/// The digest depends only on logical content: key order and numeric
/// formatting in the input never change the result.
pub fn hash_value(value: &Value) -> Result<ContentHash> {
    let json = canonical_json(value)?;
    Ok(ContentHash::hash(json.as_bytes()))
}

/// Hash a value and render the digest as lowercase `0x`-hex.
pub fn hash_value_hex(value: &Value) -> Result<String> {
    hash_value(value).map(|h| h.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keccak_empty_input() {
        // Well-known Keccak-256 digest of the empty string.
        let h = ContentHash::hash(b"");
        assert_eq!(
            h.to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash_key_order_invariant() {
        let a: serde_json::Value = serde_json::from_str(r#"{"x":1,"y":2}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"y":2,"x":1}"#).unwrap();
        assert_eq!(hash_value(&a).unwrap(), hash_value(&b).unwrap());
    }

    #[test]
    fn test_hash_sensitivity() {
        let a = json!({"totalSupply": "1000"});
        let b = json!({"totalSupply": "1001"});
        assert_ne!(hash_value(&a).unwrap(), hash_value(&b).unwrap());
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let h = hash_value(&json!({"a": 1})).unwrap();
        let parsed = ContentHash::from_hex(&h.to_hex()).unwrap();
        assert_eq!(h, parsed);

        // Prefix-less and uppercase forms parse to the same hash.
        let upper = h.to_hex()[2..].to_ascii_uppercase();
        assert_eq!(ContentHash::from_hex(&upper).unwrap(), h);
    }

    #[test]
    fn test_hash_hex_rejects_wrong_length() {
        assert!(ContentHash::from_hex("0xabcd").is_err());
    }
}
