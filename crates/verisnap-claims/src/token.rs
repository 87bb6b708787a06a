//! Stateless claim tokens.
//!
//! A claim token authorizes one specific publish action: it binds a domain,
//! a contract address, a project slug, and a version into a time-boxed,
//! HMAC-signed bearer credential. Nothing is persisted; validity is decided
//! entirely by the signature and the expiry at verification time.
//!
//! Wire format: `base64url(payload JSON) + "." + base64url(HMAC-SHA256 of
//! the first segment)`, no padding, exactly two segments.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::ClaimError;

type HmacSha256 = Hmac<Sha256>;

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// The signed payload carried inside a claim token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPayload {
    pub domain: String,
    pub uri: String,
    pub chain_id: u64,
    pub token_address: String,
    pub slug: String,
    pub version: u32,
    pub nonce: String,
    pub issued_at: String,
    pub expires_at: String,
}

/// The publish action a claim should authorize.
#[derive(Debug, Clone)]
pub struct ClaimSpec {
    pub domain: String,
    pub uri: String,
    pub chain_id: u64,
    pub token_address: String,
    pub slug: String,
    pub version: u32,
}

/// Result of minting a claim: the payload, the human-readable message the
/// wallet will sign, and the bearer token to hand back at publish time.
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    pub payload: ClaimPayload,
    pub message: String,
    pub token: String,
}

/// Mints and verifies claim tokens with a server-held secret.
#[derive(Clone)]
pub struct ClaimAuthority {
    secret: Vec<u8>,
}

impl ClaimAuthority {
    /// Create an authority. Rejects secrets shorter than [`MIN_SECRET_LEN`].
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ClaimError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ClaimError::WeakSecret(MIN_SECRET_LEN));
        }
        Ok(Self { secret })
    }

    /// Default claim lifetime.
    pub fn default_ttl() -> Duration {
        Duration::minutes(10)
    }

    /// Mint a claim request with the default ttl.
    pub fn create_request(&self, spec: &ClaimSpec) -> ClaimRequest {
        self.create_request_with_ttl(spec, Self::default_ttl())
    }

    /// Mint a claim request with an explicit ttl.
    pub fn create_request_with_ttl(&self, spec: &ClaimSpec, ttl: Duration) -> ClaimRequest {
        self.create_request_at(spec, ttl, Utc::now())
    }

    fn create_request_at(
        &self,
        spec: &ClaimSpec,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> ClaimRequest {
        let payload = ClaimPayload {
            domain: spec.domain.clone(),
            uri: spec.uri.clone(),
            chain_id: spec.chain_id,
            token_address: spec.token_address.to_ascii_lowercase(),
            slug: spec.slug.clone(),
            version: spec.version,
            nonce: random_nonce(),
            issued_at: iso(now),
            expires_at: iso(now + ttl),
        };

        let message = build_claim_message(&payload);
        let token = self.sign_token(&payload);

        ClaimRequest {
            payload,
            message,
            token,
        }
    }

    /// Verify a token against the current clock.
    pub fn verify_token(&self, token: &str) -> Result<ClaimPayload, ClaimError> {
        self.verify_token_at(token, Utc::now())
    }

    /// Verify a token against an explicit clock.
    ///
    /// Malformed tokens and signature mismatches all come back as
    /// [`ClaimError::InvalidToken`]; only a genuinely signed-but-stale token
    /// comes back as [`ClaimError::Expired`].
    pub fn verify_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ClaimPayload, ClaimError> {
        let segments: Vec<&str> = token.split('.').collect();
        let &[payload_b64, sig_b64] = segments.as_slice() else {
            return Err(ClaimError::InvalidToken);
        };
        if payload_b64.is_empty() || sig_b64.is_empty() {
            return Err(ClaimError::InvalidToken);
        }

        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| ClaimError::InvalidToken)?;
        let mut mac = self.mac();
        mac.update(payload_b64.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(&sig).map_err(|_| ClaimError::InvalidToken)?;

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| ClaimError::InvalidToken)?;
        let payload: ClaimPayload =
            serde_json::from_slice(&payload_json).map_err(|_| ClaimError::InvalidToken)?;

        let expires_at =
            DateTime::parse_from_rfc3339(&payload.expires_at).map_err(|_| ClaimError::Expired)?;
        if now > expires_at.with_timezone(&Utc) {
            return Err(ClaimError::Expired);
        }

        Ok(payload)
    }

    fn sign_token(&self, payload: &ClaimPayload) -> String {
        let json = serde_json::to_vec(payload).expect("claim payload serializes");
        let payload_b64 = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac();
        mac.update(payload_b64.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", payload_b64, sig_b64)
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key length")
    }
}

/// Reconstruct the human-readable claim message from a payload.
///
/// Deterministic and built solely from payload fields, so the server can
/// rebuild it at publish time and reject a client that signed anything
/// else under the same token.
pub fn build_claim_message(payload: &ClaimPayload) -> String {
    [
        format!(
            "{} wants you to sign in with your Ethereum account:",
            payload.domain
        ),
        payload.token_address.clone(),
        String::new(),
        format!(
            "Statement: I claim publishing rights for token {} (project {}) version {} on chain {}.",
            payload.token_address, payload.slug, payload.version, payload.chain_id
        ),
        format!("URI: {}", payload.uri),
        format!("Chain ID: {}", payload.chain_id),
        format!("Nonce: {}", payload.nonce),
        format!("Issued At: {}", payload.issued_at),
        format!("Expiration Time: {}", payload.expires_at),
    ]
    .join("\n")
}

fn iso(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn random_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
