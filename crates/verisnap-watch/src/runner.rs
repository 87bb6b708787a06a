//! The watch runner: one check per project, one sweep per poll.
//!
//! Every check leaves an audit trail. A `Running` run record is inserted
//! before any observation happens, then finalized to `Success`, `NoChange`,
//! or `Error`; failures are captured into the record so one broken project
//! cannot halt a sweep.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use verisnap_core::{canonicalize, diff_canonical, hash_value_hex, DiffEntry};

use crate::error::{StoreError, StoreResult, WatchError};
use crate::evidence::EvidenceSource;
use crate::fields::{extract_watch_fields, risk_override};
use crate::notify::Notifier;
use crate::scheduler::is_due;
use crate::store::WatchStore;
use crate::types::{RunStatus, Snapshot, SnapshotStatus, WatchRun};

/// Result of one polling sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Projects that were due and got checked.
    pub checked: usize,
    /// Checks that detected a change and published a new version.
    pub changed: usize,
}

/// What a successful check concluded.
enum CheckOutcome {
    NoChange,
    Changed {
        new_version: u32,
        changed_fields: Vec<String>,
    },
}

/// Drives watch checks against a store, an evidence source, and a notifier.
pub struct Watcher<S> {
    store: Arc<S>,
    evidence: Arc<dyn EvidenceSource>,
    notifier: Arc<dyn Notifier>,
}

impl<S: WatchStore> Watcher<S> {
    pub fn new(
        store: Arc<S>,
        evidence: Arc<dyn EvidenceSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            evidence,
            notifier,
        }
    }

    /// Run one check for a single project.
    ///
    /// Returns the finalized run record. Only failures of the run
    /// bookkeeping itself propagate as errors; everything that goes wrong
    /// during the check lands in the record's `error` field.
    pub async fn run_watch_check(&self, slug: &str) -> StoreResult<WatchRun> {
        let mut run = WatchRun {
            id: 0,
            slug: slug.to_string(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
            error: None,
            new_version: None,
            changed_fields: Vec::new(),
        };
        run.id = self.store.insert_run(&run).await?;

        match self.check(slug).await {
            Ok(CheckOutcome::NoChange) => {
                run.status = RunStatus::NoChange;
            }
            Ok(CheckOutcome::Changed {
                new_version,
                changed_fields,
            }) => {
                run.status = RunStatus::Success;
                run.new_version = Some(new_version);
                run.changed_fields = changed_fields;
            }
            Err(err) => {
                run.status = RunStatus::Error;
                run.error = Some(err.to_string());
                warn!(slug, error = %err, "watch check failed");
            }
        }

        run.finished_at = Some(Utc::now());
        self.store.update_run(&run).await?;
        Ok(run)
    }

    /// Check all watch-enabled projects that are due, sequentially.
    pub async fn poll_once(&self) -> StoreResult<PollOutcome> {
        let now = Utc::now();
        let mut outcome = PollOutcome {
            checked: 0,
            changed: 0,
        };

        for slug in self.store.list_watch_enabled().await? {
            if !self.project_is_due(&slug, now).await? {
                continue;
            }

            outcome.checked += 1;
            let run = self.run_watch_check(&slug).await?;
            if run.status == RunStatus::Success {
                outcome.changed += 1;
            }
        }

        info!(
            checked = outcome.checked,
            changed = outcome.changed,
            "poll sweep complete"
        );
        Ok(outcome)
    }

    /// Poll at a fixed cadence, forever. Intended to be spawned as a task;
    /// sweep failures are logged and the loop keeps going.
    pub async fn run(&self, every: std::time::Duration) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = self.poll_once().await {
                warn!(error = %err, "poll sweep failed");
            }
        }
    }

    async fn project_is_due(&self, slug: &str, now: chrono::DateTime<Utc>) -> StoreResult<bool> {
        let Some(project) = self.store.get_project(slug).await? else {
            return Ok(false);
        };

        let risky = match self.store.latest_published(slug).await? {
            Some(snapshot) => risk_override(&snapshot.content),
            None => false,
        };

        let last_run_at = self.store.last_run(slug).await?.map(|r| r.started_at);
        Ok(is_due(project.created_at, risky, last_run_at, now))
    }

    async fn check(&self, slug: &str) -> Result<CheckOutcome, WatchError> {
        let project = self
            .store
            .get_project(slug)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("project {}", slug)))?;

        let previous = self
            .store
            .latest_published(slug)
            .await?
            .ok_or(WatchError::NoBaseline)?;

        let observed = self.evidence.observe(&project).await?;
        let observed = canonicalize(&observed)?;

        // Only the watch field subset decides whether to republish; block
        // numbers and observation timestamps churn on every poll.
        let watched_before = extract_watch_fields(&previous.content);
        let watched_after = extract_watch_fields(&observed);
        let watch_changes = diff_canonical(&watched_before, &watched_after);

        if watch_changes.is_empty() {
            return Ok(CheckOutcome::NoChange);
        }

        let changed_fields: Vec<String> =
            watch_changes.iter().map(|c| c.path.clone()).collect();
        let full_changes: Vec<DiffEntry> = diff_canonical(&previous.content, &observed);

        let new_version = previous.version + 1;
        let now = Utc::now();
        let snapshot = Snapshot {
            slug: slug.to_string(),
            version: new_version,
            status: SnapshotStatus::Draft,
            content_hash: hash_value_hex(&observed)?,
            content: observed,
            created_at: now,
            published_at: None,
        };

        // Watcher publishes are automatic: the project already proved
        // ownership when the baseline version was claimed.
        self.store.upsert_draft(&snapshot).await?;
        self.store.publish_snapshot(slug, new_version).await?;
        self.store
            .insert_diff(&crate::types::DiffRecord {
                slug: slug.to_string(),
                from_version: previous.version,
                to_version: new_version,
                entries: full_changes,
                created_at: now,
            })
            .await?;

        info!(
            slug,
            version = new_version,
            fields = ?changed_fields,
            "watch check published new version"
        );

        // Best-effort: the version is already committed.
        if let Err(err) = self
            .notifier
            .notify_change(slug, new_version, &changed_fields)
            .await
        {
            warn!(slug, error = %err, "change notification failed");
        }

        Ok(CheckOutcome::Changed {
            new_version,
            changed_fields,
        })
    }
}
