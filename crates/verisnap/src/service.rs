//! The Service: unified API for the VeriSnap system.
//!
//! The Service brings together canonical snapshots, claim-gated
//! publishing, signer recovery, rate limiting, and the drift watcher into
//! a cohesive interface for building servers on top of.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::info;

use verisnap_claims::{
    build_claim_message, recover_personal_sign_address, ClaimAuthority, ClaimRequest, ClaimSpec,
    EthCall,
};
use verisnap_core::{canonicalize, diff_canonical, hash_value_hex, verify_value, DiffEntry,
    VerifyOutcome};
use verisnap_limit::RateLimiter;
use verisnap_watch::{
    default_slug, DiffRecord, EvidenceSource, Notifier, PollOutcome, Project, Snapshot,
    SnapshotStatus, WatchRun, WatchStore, Watcher,
};

use crate::error::{Result, ServiceError};

/// Configuration for the Service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Domain presented in claim messages.
    pub domain: String,
    /// Origin URI presented in claim messages.
    pub uri: String,
    /// Network name used in derived slugs.
    pub network: String,
    /// Chain id stamped onto new projects and claim payloads.
    pub chain_id: u64,
    /// Claim token lifetime.
    pub claim_ttl: Duration,
    /// Claim mints allowed per client IP per minute.
    pub claim_requests_per_minute: u32,
    /// Publishes allowed per signer address per minute.
    pub publishes_per_minute: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            uri: "http://localhost".to_string(),
            network: "base".to_string(),
            chain_id: 8453,
            claim_ttl: ClaimAuthority::default_ttl(),
            claim_requests_per_minute: 10,
            publishes_per_minute: 5,
        }
    }
}

/// Input to [`Service::generate_draft`].
#[derive(Debug, Clone)]
pub struct DraftRequest {
    /// The contract to observe.
    pub contract_address: String,
    /// Explicit slug; derived from the address when absent.
    pub slug: Option<String>,
    /// Explicit display name; inferred from the observed token name when
    /// absent.
    pub name: Option<String>,
}

/// Result of draft generation: the (possibly new) project and its draft.
#[derive(Debug, Clone)]
pub struct DraftOutcome {
    pub project: Project,
    pub snapshot: Snapshot,
}

/// Result of a successful claim-gated publish.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// The now-published snapshot.
    pub snapshot: Snapshot,
    /// Address recovered from the wallet signature.
    pub signer: String,
    /// Full structural diff against the previous published version.
    /// Empty for a first publish.
    pub changes: Vec<DiffEntry>,
}

/// The main Service struct.
///
/// Provides a unified API for:
/// - Drafting canonicalized, content-addressed snapshots
/// - Minting claim requests and publishing with a wallet signature
/// - Verifying stored snapshots against their hashes
/// - Running the background drift watcher
pub struct Service<S: WatchStore> {
    store: Arc<S>,
    authority: ClaimAuthority,
    evidence: Arc<dyn EvidenceSource>,
    rpc: Arc<dyn EthCall>,
    watcher: Watcher<S>,
    claim_limiter: RateLimiter,
    publish_limiter: RateLimiter,
    config: ServiceConfig,
}

impl<S: WatchStore> Service<S> {
    /// Create a new service instance.
    ///
    /// `secret` signs claim tokens and must be at least 32 bytes.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        config: ServiceConfig,
        store: Arc<S>,
        evidence: Arc<dyn EvidenceSource>,
        rpc: Arc<dyn EthCall>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let authority = ClaimAuthority::new(secret)?;
        let watcher = Watcher::new(store.clone(), evidence.clone(), notifier);
        let claim_limiter =
            RateLimiter::new("claim", config.claim_requests_per_minute, 60_000);
        let publish_limiter =
            RateLimiter::new("publish", config.publishes_per_minute, 60_000);

        Ok(Self {
            store,
            authority,
            evidence,
            rpc,
            watcher,
            claim_limiter,
            publish_limiter,
            config,
        })
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshot Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Observe a contract and store the result as the next draft version,
    /// creating or refreshing the project record along the way.
    ///
    /// The version is one past the latest published version (or 1 for a
    /// project that has never published). Re-drafting the same pending
    /// version replaces it.
    pub async fn generate_draft(&self, request: DraftRequest) -> Result<DraftOutcome> {
        let contract_address = request.contract_address.to_ascii_lowercase();
        let slug = match request.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => default_slug(&self.config.network, &contract_address),
        };

        let existing = self.store.get_project(&slug).await?;
        let mut project = existing.unwrap_or_else(|| Project {
            slug: slug.clone(),
            chain_id: self.config.chain_id,
            token_address: contract_address.clone(),
            display_name: None,
            watch_enabled: true,
            created_at: Utc::now(),
        });

        let observed = self.evidence.observe(&project).await?;
        let canonical = canonicalize(&observed)?;

        if let Some(name) = request.name.as_deref().map(str::trim) {
            if !name.is_empty() {
                project.display_name = Some(name.to_string());
            }
        }
        if project.display_name.is_none() {
            project.display_name = infer_name(&canonical);
        }
        self.store.upsert_project(&project).await?;

        let version = match self.store.latest_published(&slug).await? {
            Some(published) => published.version + 1,
            None => 1,
        };

        let snapshot = Snapshot {
            slug: slug.clone(),
            version,
            status: SnapshotStatus::Draft,
            content_hash: hash_value_hex(&canonical)?,
            content: canonical,
            created_at: Utc::now(),
            published_at: None,
        };
        self.store.upsert_draft(&snapshot).await?;

        info!(slug, version, hash = %snapshot.content_hash, "draft generated");
        Ok(DraftOutcome { project, snapshot })
    }

    /// Verify a stored snapshot's content against its recorded hash.
    pub async fn verify_snapshot(&self, slug: &str, version: u32) -> Result<VerifyOutcome> {
        let snapshot = self
            .store
            .get_snapshot(slug, version)
            .await?
            .ok_or_else(|| ServiceError::SnapshotNotFound {
                slug: slug.to_string(),
                version,
            })?;
        Ok(verify_value(&snapshot.content, &snapshot.content_hash))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Claim Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Mint a claim request authorizing one publish of `(slug, version)`.
    ///
    /// `client` identifies the caller for rate limiting; resolve it with
    /// [`verisnap_limit::client_identity`] at the HTTP boundary.
    pub async fn start_claim(
        &self,
        slug: &str,
        version: u32,
        client: &str,
    ) -> Result<ClaimRequest> {
        self.claim_limiter.check(client)?;

        let project = self
            .store
            .get_project(slug)
            .await?
            .ok_or_else(|| ServiceError::ProjectNotFound(slug.to_string()))?;

        if self.store.get_snapshot(slug, version).await?.is_none() {
            return Err(ServiceError::SnapshotNotFound {
                slug: slug.to_string(),
                version,
            });
        }

        let spec = ClaimSpec {
            domain: self.config.domain.clone(),
            uri: self.config.uri.clone(),
            chain_id: project.chain_id,
            token_address: project.token_address.clone(),
            slug: slug.to_string(),
            version,
        };
        Ok(self
            .authority
            .create_request_with_ttl(&spec, self.config.claim_ttl))
    }

    /// Publish a draft, gated on a claim token and a wallet signature over
    /// the claim message.
    ///
    /// The submitted message must match the reconstruction from the
    /// verified token payload, and recovery runs against the
    /// reconstruction, so the signature only counts if the wallet signed
    /// exactly what this service minted.
    pub async fn publish_with_claim(
        &self,
        slug: &str,
        version: u32,
        token: &str,
        message: &str,
        signature: &str,
    ) -> Result<PublishOutcome> {
        let payload = self.authority.verify_token(token)?;

        if payload.slug != slug || payload.version != version {
            return Err(ServiceError::ClaimMismatch(format!(
                "token is for {} v{}",
                payload.slug, payload.version
            )));
        }

        let project = self
            .store
            .get_project(slug)
            .await?
            .ok_or_else(|| ServiceError::ProjectNotFound(slug.to_string()))?;
        if payload.token_address != project.token_address.to_ascii_lowercase() {
            return Err(ServiceError::ClaimMismatch(
                "token is for a different contract".to_string(),
            ));
        }

        let expected_message = build_claim_message(&payload);
        if message != expected_message {
            return Err(ServiceError::ClaimMismatch(
                "signed message does not match the claim".to_string(),
            ));
        }
        let signer =
            recover_personal_sign_address(self.rpc.as_ref(), &expected_message, signature)
                .await?;
        self.publish_limiter.check(&signer)?;

        // Capture the baseline before the publish changes what "latest" is.
        let previous = self.store.latest_published(slug).await?;
        let snapshot = self.store.publish_snapshot(slug, version).await?;

        let changes = match &previous {
            Some(prev) => {
                let entries = diff_canonical(&prev.content, &snapshot.content);
                self.store
                    .insert_diff(&DiffRecord {
                        slug: slug.to_string(),
                        from_version: prev.version,
                        to_version: version,
                        entries: entries.clone(),
                        created_at: Utc::now(),
                    })
                    .await?;
                entries
            }
            None => Vec::new(),
        };

        info!(slug, version, signer = %signer, "snapshot published");
        Ok(PublishOutcome {
            snapshot,
            signer,
            changes,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Watch Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Run one watch check for a single project.
    pub async fn run_watch_check(&self, slug: &str) -> Result<WatchRun> {
        Ok(self.watcher.run_watch_check(slug).await?)
    }

    /// Check all due watch-enabled projects once.
    pub async fn poll_once(&self) -> Result<PollOutcome> {
        Ok(self.watcher.poll_once().await?)
    }
}

/// Pull a display name out of observed content, if the token reported one.
fn infer_name(content: &Value) -> Option<String> {
    content
        .pointer("/token/name/value")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
}
