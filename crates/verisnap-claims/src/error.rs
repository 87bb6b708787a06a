//! Error types for the claims module.

use thiserror::Error;

/// Errors raised when minting or verifying claim tokens.
///
/// Malformed structure and signature mismatch share the single
/// `InvalidToken` variant so the error is not an oracle distinguishing the
/// two. Expiry is distinct: it is an expected, non-adversarial condition
/// that callers surface differently.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Malformed token or signature mismatch.
    #[error("invalid claim token")]
    InvalidToken,

    /// The token's signature is fine but `expiresAt` has passed.
    #[error("claim token expired")]
    Expired,

    /// The configured secret is unusable.
    #[error("claim secret must be at least {0} bytes")]
    WeakSecret(usize),
}

/// Errors raised while recovering a signer address.
///
/// Each variant is fatal to the publish attempt; the caller must obtain a
/// fresh signature rather than retry.
#[derive(Debug, Error)]
pub enum RecoverError {
    #[error("invalid signature length")]
    InvalidLength,

    #[error("invalid signature hex")]
    InvalidHex,

    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("ecrecover returned an empty result")]
    EmptyResult,

    #[error("ecrecover returned an invalid address")]
    InvalidAddress,

    #[error("rpc error: {0}")]
    Rpc(#[from] crate::rpc::RpcError),
}
