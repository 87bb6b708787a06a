//! The chain RPC seam.
//!
//! The claims module never speaks HTTP itself; callers inject whatever
//! client already serves their chain reads. Only `eth_call` is needed here,
//! to reach the ECDSA-recover precompile.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by an RPC client implementation.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport-level failure (connection, timeout, non-2xx).
    #[error("rpc transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc returned error: {0}")]
    Response(String),
}

/// Minimal `eth_call` capability.
///
/// `to` is a `0x`-prefixed address, `data` is `0x`-prefixed calldata hex;
/// the returned string is the raw `0x`-prefixed result. Implementations
/// should be cancellable/timeout-bound; this crate never blocks on its own.
#[async_trait]
pub trait EthCall: Send + Sync {
    async fn eth_call(&self, to: &str, data: &str) -> Result<String, RpcError>;
}
