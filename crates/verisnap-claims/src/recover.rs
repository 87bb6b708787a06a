//! Signer recovery through the `ecrecover` precompile.
//!
//! Instead of bundling a secp256k1 implementation, recovery is delegated to
//! the precompile at address 0x01 via `eth_call`. Any node answers this from
//! pure computation, so the call is free, stateless, and block-independent.

use crate::error::RecoverError;
use crate::personal_sign::{parse_signature, personal_sign_digest};
use crate::rpc::EthCall;

/// Address of the ECDSA recovery precompile.
pub const ECRECOVER_PRECOMPILE: &str = "0x0000000000000000000000000000000000000001";

/// Recover the Ethereum address that produced `signature` over `message`
/// via `personal_sign`.
///
/// The returned address is `0x`-prefixed and lowercased. Failures are
/// fatal to the attempt; the caller should request a fresh signature.
pub async fn recover_personal_sign_address(
    rpc: &dyn EthCall,
    message: &str,
    signature: &str,
) -> Result<String, RecoverError> {
    let parsed = parse_signature(signature)?;
    let digest = personal_sign_digest(message);

    // Precompile input: digest ‖ v (left-padded to 32 bytes) ‖ r ‖ s.
    let mut calldata = Vec::with_capacity(128);
    calldata.extend_from_slice(&digest);
    calldata.extend_from_slice(&[0u8; 31]);
    calldata.push(parsed.v);
    calldata.extend_from_slice(&parsed.r);
    calldata.extend_from_slice(&parsed.s);

    let result = rpc
        .eth_call(ECRECOVER_PRECOMPILE, &format!("0x{}", hex::encode(calldata)))
        .await?;

    // An invalid signature yields an empty (or all-absent) result rather
    // than an error from the node.
    let body = result.strip_prefix("0x").unwrap_or(&result);
    if body.len() < 40 {
        return Err(RecoverError::EmptyResult);
    }

    // The address occupies the low 20 bytes of the 32-byte word.
    let address = body[body.len() - 40..].to_ascii_lowercase();
    if !address.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RecoverError::InvalidAddress);
    }

    Ok(format!("0x{}", address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned-response node that records the calldata it was handed.
    struct StubNode {
        response: Result<String, RpcError>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl StubNode {
        fn replying(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl EthCall for StubNode {
        async fn eth_call(&self, to: &str, data: &str) -> Result<String, RpcError> {
            self.seen
                .lock()
                .unwrap()
                .push((to.to_string(), data.to_string()));
            match &self.response {
                Ok(s) => Ok(s.clone()),
                Err(RpcError::Transport(m)) => Err(RpcError::Transport(m.clone())),
                Err(RpcError::Response(m)) => Err(RpcError::Response(m.clone())),
            }
        }
    }

    fn valid_sig() -> String {
        format!("0x{}{}1b", "11".repeat(32), "22".repeat(32))
    }

    #[tokio::test]
    async fn test_extracts_lowercased_address_from_word() {
        let word = format!("0x{}AbCdEF0000000000000000000000000000000001", "00".repeat(12));
        let node = StubNode::replying(&word);

        let address = recover_personal_sign_address(&node, "msg", &valid_sig())
            .await
            .unwrap();
        assert_eq!(address, "0xabcdef0000000000000000000000000000000001");
    }

    #[tokio::test]
    async fn test_calldata_layout() {
        let word = format!("0x{}{}", "00".repeat(12), "aa".repeat(20));
        let node = StubNode::replying(&word);

        recover_personal_sign_address(&node, "hello", &valid_sig())
            .await
            .unwrap();

        let seen = node.seen.lock().unwrap();
        let (to, data) = &seen[0];
        assert_eq!(to, ECRECOVER_PRECOMPILE);
        // 0x + 128 bytes (digest, padded v, r, s).
        assert_eq!(data.len(), 2 + 256);

        let digest = hex::encode(personal_sign_digest("hello"));
        assert_eq!(&data[2..66], digest.as_str());
        // v = 27 left-padded to a word.
        assert_eq!(&data[66..130], format!("{}1b", "00".repeat(31)).as_str());
        assert_eq!(&data[130..194], "11".repeat(32).as_str());
        assert_eq!(&data[194..258], "22".repeat(32).as_str());
    }

    #[tokio::test]
    async fn test_empty_result_is_rejected() {
        for empty in ["", "0x"] {
            let node = StubNode::replying(empty);
            assert!(matches!(
                recover_personal_sign_address(&node, "msg", &valid_sig()).await,
                Err(RecoverError::EmptyResult)
            ));
        }
    }

    #[tokio::test]
    async fn test_non_hex_address_is_rejected() {
        let word = format!("0x{}zz{}", "00".repeat(12), "aa".repeat(19));
        let node = StubNode::replying(&word);
        assert!(matches!(
            recover_personal_sign_address(&node, "msg", &valid_sig()).await,
            Err(RecoverError::InvalidAddress)
        ));
    }

    #[tokio::test]
    async fn test_rpc_errors_propagate() {
        let node = StubNode {
            response: Err(RpcError::Transport("connection refused".into())),
            seen: Mutex::new(Vec::new()),
        };
        assert!(matches!(
            recover_personal_sign_address(&node, "msg", &valid_sig()).await,
            Err(RecoverError::Rpc(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_signature_never_reaches_rpc() {
        let node = StubNode::replying("0x");
        let result = recover_personal_sign_address(&node, "msg", "0x1234").await;
        assert!(matches!(result, Err(RecoverError::InvalidLength)));
        assert!(node.seen.lock().unwrap().is_empty());
    }
}
