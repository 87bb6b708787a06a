//! EIP-191 `personal_sign` digesting and signature parsing.

use sha3::{Digest, Keccak256};

use crate::error::RecoverError;

/// A 65-byte ECDSA signature split into its recovery parts.
///
/// `v` is already normalized to 27/28 regardless of whether the wallet
/// emitted 0/1 or 27/28.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

/// Compute the EIP-191 digest a wallet actually signs for `personal_sign`:
/// `keccak256("\x19Ethereum Signed Message:\n" + byte length + message)`.
pub fn personal_sign_digest(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n");
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Parse a `0x`-prefixed 65-byte hex signature into `r`, `s`, and a
/// normalized `v`.
pub fn parse_signature(signature: &str) -> Result<ParsedSignature, RecoverError> {
    let body = signature
        .strip_prefix("0x")
        .ok_or(RecoverError::InvalidLength)?;
    if body.len() != 130 {
        return Err(RecoverError::InvalidLength);
    }

    let bytes = hex::decode(body).map_err(|_| RecoverError::InvalidHex)?;
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[0..32]);
    s.copy_from_slice(&bytes[32..64]);

    let v = match bytes[64] {
        0 | 27 => 27,
        1 | 28 => 28,
        other => return Err(RecoverError::InvalidRecoveryId(other)),
    };

    Ok(ParsedSignature { r, s, v })
}
