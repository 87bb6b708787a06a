//! # VeriSnap
//!
//! The unified API for VeriSnap - verifiable, versioned snapshots of
//! on-chain contract state.
//!
//! ## Overview
//!
//! VeriSnap provides a library for:
//!
//! - **Canonical snapshots**: deterministic normalization and Keccak-256
//!   content addressing of observed contract state
//! - **Claim-gated publishing**: a wallet signature over an HMAC-signed
//!   claim proves who published each version
//! - **Verification**: any stored version can be re-checked against its
//!   recorded hash, with a tri-state outcome
//! - **Drift watching**: published projects are re-observed on an
//!   age-tiered cadence and republished when security-relevant fields move
//!
//! ## Key Concepts
//!
//! - **Snapshot**: immutable once published. Changes are new versions.
//! - **Claim**: a stateless, expiring token binding one publish action.
//! - **Watch run**: an audit record of one background check, kept even
//!   when the check fails.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use verisnap::{Service, ServiceConfig};
//! use verisnap::watch::{MemoryWatchStore, NoopNotifier};
//!
//! # use async_trait::async_trait;
//! # struct MyEvidence;
//! # #[async_trait]
//! # impl verisnap::watch::EvidenceSource for MyEvidence {
//! #     async fn observe(&self, _: &verisnap::watch::Project)
//! #         -> Result<serde_json::Value, verisnap::watch::EvidenceError> { unimplemented!() }
//! # }
//! # struct MyRpc;
//! # #[async_trait]
//! # impl verisnap::claims::EthCall for MyRpc {
//! #     async fn eth_call(&self, _: &str, _: &str)
//! #         -> Result<String, verisnap::claims::RpcError> { unimplemented!() }
//! # }
//! fn example() {
//!     let service = Service::new(
//!         std::env::var("CLAIM_SECRET").unwrap(),
//!         ServiceConfig::default(),
//!         Arc::new(MemoryWatchStore::new()),
//!         Arc::new(MyEvidence),
//!         Arc::new(MyRpc),
//!         Arc::new(NoopNotifier),
//!     )
//!     .unwrap();
//!
//!     // service.generate_draft(...), service.start_claim(...),
//!     // service.publish_with_claim(...), service.poll_once()
//!     let _ = service;
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `verisnap::core` - canonical form, hashing, verification, diffing
//! - `verisnap::claims` - claim tokens and signer recovery
//! - `verisnap::watch` - persistence traits and the drift watcher
//! - `verisnap::limit` - fixed-window rate limiting

pub mod error;
pub mod service;

pub use error::{Result, ServiceError};
pub use service::{DraftOutcome, DraftRequest, PublishOutcome, Service, ServiceConfig};

pub use verisnap_claims as claims;
pub use verisnap_core as core;
pub use verisnap_limit as limit;
pub use verisnap_watch as watch;
