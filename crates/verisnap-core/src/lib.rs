//! # VeriSnap Core
//!
//! Pure primitives for VeriSnap: canonical snapshot form, content hashing,
//! verification, and structural diffing.
//!
//! This crate contains no I/O, no storage, no networking. Every function is
//! synchronous, side-effect free, and safe to call concurrently from any
//! number of threads.
//!
//! ## Key pieces
//!
//! - [`canonicalize`] / [`canonical_json`] - deterministic normalization of
//!   snapshot values
//! - [`ContentHash`] / [`hash_value`] - Keccak-256 content addressing
//! - [`verify_value`] / [`verify_text`] - tri-state hash verification
//! - [`diff`] - leaf-level structural comparison
//! - [`SnapshotField`] - the tagged evidence shape consumed at the boundary

pub mod canonical;
pub mod diff;
pub mod digest;
pub mod error;
pub mod field;
pub mod verify;

pub use canonical::{canonical_json, canonicalize, canonicalize_text};
pub use diff::{diff, diff_canonical, DiffEntry};
pub use digest::{hash_value, hash_value_hex, ContentHash};
pub use error::{CanonicalError, Result};
pub use field::{Provenance, SnapshotField, TruthStatus};
pub use verify::{verify_text, verify_value, VerifyOutcome, VerifyStatus};
