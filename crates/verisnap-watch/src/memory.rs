//! In-memory implementation of the WatchStore trait.
//!
//! Primarily for tests. Same semantics as a database-backed store but
//! keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{StoreError, StoreResult};
use crate::store::WatchStore;
use crate::types::{DiffRecord, Project, Snapshot, SnapshotStatus, WatchRun};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryWatchStore {
    inner: RwLock<MemoryWatchStoreInner>,
}

struct MemoryWatchStoreInner {
    /// Projects indexed by slug.
    projects: HashMap<String, Project>,

    /// Snapshots indexed by (slug, version).
    snapshots: HashMap<(String, u32), Snapshot>,

    /// Runs indexed by id.
    runs: HashMap<u64, WatchRun>,

    /// Next run id to assign.
    next_run_id: u64,

    /// Diffs per slug, in insertion order.
    diffs: HashMap<String, Vec<DiffRecord>>,
}

impl MemoryWatchStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryWatchStoreInner {
                projects: HashMap::new(),
                snapshots: HashMap::new(),
                runs: HashMap::new(),
                next_run_id: 1,
                diffs: HashMap::new(),
            }),
        }
    }
}

impl Default for MemoryWatchStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WatchStore for MemoryWatchStore {
    async fn upsert_project(&self, project: &Project) -> StoreResult<()> {
        let mut inner = self.inner.write().unwrap();
        inner.projects.insert(project.slug.clone(), project.clone());
        Ok(())
    }

    async fn get_project(&self, slug: &str) -> StoreResult<Option<Project>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.projects.get(slug).cloned())
    }

    async fn list_watch_enabled(&self) -> StoreResult<Vec<String>> {
        let inner = self.inner.read().unwrap();
        let mut slugs: Vec<String> = inner
            .projects
            .values()
            .filter(|p| p.watch_enabled)
            .map(|p| p.slug.clone())
            .collect();
        slugs.sort();
        Ok(slugs)
    }

    async fn upsert_draft(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let mut inner = self.inner.write().unwrap();
        let key = (snapshot.slug.clone(), snapshot.version);

        if let Some(existing) = inner.snapshots.get(&key) {
            if existing.status == SnapshotStatus::Published {
                return Err(StoreError::Conflict(format!(
                    "snapshot {} v{} is already published",
                    snapshot.slug, snapshot.version
                )));
            }
        }

        inner.snapshots.insert(key, snapshot.clone());
        Ok(())
    }

    async fn publish_snapshot(&self, slug: &str, version: u32) -> StoreResult<Snapshot> {
        let mut inner = self.inner.write().unwrap();
        let key = (slug.to_string(), version);

        let snapshot = inner.snapshots.get_mut(&key).ok_or_else(|| {
            StoreError::NotFound(format!("snapshot {} v{}", slug, version))
        })?;

        if snapshot.status != SnapshotStatus::Published {
            snapshot.status = SnapshotStatus::Published;
            snapshot.published_at = Some(Utc::now());
        }

        Ok(snapshot.clone())
    }

    async fn get_snapshot(&self, slug: &str, version: u32) -> StoreResult<Option<Snapshot>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.snapshots.get(&(slug.to_string(), version)).cloned())
    }

    async fn latest_published(&self, slug: &str) -> StoreResult<Option<Snapshot>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .snapshots
            .values()
            .filter(|s| s.slug == slug && s.status == SnapshotStatus::Published)
            .max_by_key(|s| s.version)
            .cloned())
    }

    async fn insert_run(&self, run: &WatchRun) -> StoreResult<u64> {
        let mut inner = self.inner.write().unwrap();
        let id = inner.next_run_id;
        inner.next_run_id += 1;

        let mut run = run.clone();
        run.id = id;
        inner.runs.insert(id, run);
        Ok(id)
    }

    async fn update_run(&self, run: &WatchRun) -> StoreResult<()> {
        let mut inner = self.inner.write().unwrap();
        if !inner.runs.contains_key(&run.id) {
            return Err(StoreError::NotFound(format!("run {}", run.id)));
        }
        inner.runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn last_run(&self, slug: &str) -> StoreResult<Option<WatchRun>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .runs
            .values()
            .filter(|r| r.slug == slug)
            .max_by_key(|r| (r.started_at, r.id))
            .cloned())
    }

    async fn insert_diff(&self, record: &DiffRecord) -> StoreResult<()> {
        let mut inner = self.inner.write().unwrap();
        inner
            .diffs
            .entry(record.slug.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn diffs_for(&self, slug: &str) -> StoreResult<Vec<DiffRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.diffs.get(slug).cloned().unwrap_or_default())
    }
}
