//! WatchStore trait: the abstract interface for snapshot persistence.
//!
//! Keeps the runner and service storage-agnostic. The in-memory
//! implementation lives in [`crate::memory`]; a database-backed one slots
//! in behind the same trait.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{DiffRecord, Project, Snapshot, WatchRun};

/// Async interface for project, snapshot, run, and diff persistence.
///
/// # Design Notes
///
/// - **Published snapshots are immutable**: `upsert_draft` refuses to
///   overwrite a version that has already been published.
/// - **Runs are append-then-update**: a run is inserted as `Running` and
///   later finalized, so interrupted checks remain visible.
#[async_trait]
pub trait WatchStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Project Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace a project record, keyed by slug.
    async fn upsert_project(&self, project: &Project) -> StoreResult<()>;

    /// Get a project by slug.
    async fn get_project(&self, slug: &str) -> StoreResult<Option<Project>>;

    /// List slugs of all projects with watching enabled, sorted.
    async fn list_watch_enabled(&self) -> StoreResult<Vec<String>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshot Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace a draft snapshot at `(slug, version)`.
    ///
    /// Returns a conflict if that version is already published.
    async fn upsert_draft(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Promote a draft to published. Returns the published snapshot.
    async fn publish_snapshot(&self, slug: &str, version: u32) -> StoreResult<Snapshot>;

    /// Get a snapshot at an exact version.
    async fn get_snapshot(&self, slug: &str, version: u32) -> StoreResult<Option<Snapshot>>;

    /// Get the highest-versioned published snapshot for a project.
    async fn latest_published(&self, slug: &str) -> StoreResult<Option<Snapshot>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Run Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a run record, returning its assigned id.
    async fn insert_run(&self, run: &WatchRun) -> StoreResult<u64>;

    /// Replace the run with `run.id`.
    async fn update_run(&self, run: &WatchRun) -> StoreResult<()>;

    /// Most recent run for a project, by started_at.
    async fn last_run(&self, slug: &str) -> StoreResult<Option<WatchRun>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Diff Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a version-to-version diff.
    async fn insert_diff(&self, record: &DiffRecord) -> StoreResult<()>;

    /// All stored diffs for a project, oldest first.
    async fn diffs_for(&self, slug: &str) -> StoreResult<Vec<DiffRecord>>;
}
