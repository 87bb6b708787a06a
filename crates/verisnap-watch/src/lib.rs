//! # VeriSnap Watch
//!
//! Snapshot persistence and the background drift watcher.
//!
//! The [`WatchStore`] trait abstracts storage of projects, versioned
//! snapshots, run audit records, and diffs; [`MemoryWatchStore`] is the
//! in-memory implementation. The [`Watcher`] re-observes published
//! projects on an age-tiered cadence ([`scheduler`]), compares a small
//! set of security-relevant fields ([`fields`]), and republishes with a
//! stored diff when they move.

pub mod error;
pub mod evidence;
pub mod fields;
pub mod memory;
pub mod notify;
pub mod runner;
pub mod scheduler;
pub mod store;
pub mod types;

pub use error::{EvidenceError, NotifyError, StoreError, StoreResult, WatchError};
pub use evidence::EvidenceSource;
pub use fields::{extract_watch_fields, risk_override, WATCH_FIELDS};
pub use memory::MemoryWatchStore;
pub use notify::{NoopNotifier, Notifier};
pub use runner::{PollOutcome, Watcher};
pub use scheduler::{check_interval, is_due};
pub use store::WatchStore;
pub use types::{default_slug, DiffRecord, Project, RunStatus, Snapshot, SnapshotStatus, WatchRun};
