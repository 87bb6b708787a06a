//! Publish authorization for VeriSnap.
//!
//! Two halves, both stateless:
//!
//! - [`token`]: HMAC-signed claim tokens binding one (project, version,
//!   address) publish action to a short expiry window.
//! - [`recover`]: resolving which Ethereum address produced a
//!   `personal_sign` signature, by delegating ECDSA recovery to the
//!   `ecrecover` precompile over an injected [`EthCall`] client.
//!
//! The intended flow: mint a [`ClaimRequest`], have the wallet sign its
//! `message`, then at publish time verify the token, rebuild the message
//! from the verified payload, and recover the signer from the signature.

pub mod error;
pub mod personal_sign;
pub mod recover;
pub mod rpc;
pub mod token;

pub use error::{ClaimError, RecoverError};
pub use personal_sign::{parse_signature, personal_sign_digest, ParsedSignature};
pub use recover::{recover_personal_sign_address, ECRECOVER_PRECOMPILE};
pub use rpc::{EthCall, RpcError};
pub use token::{
    build_claim_message, ClaimAuthority, ClaimPayload, ClaimRequest, ClaimSpec, MIN_SECRET_LEN,
};
