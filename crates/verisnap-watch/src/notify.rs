//! Change notification seam.

use async_trait::async_trait;

use crate::error::NotifyError;

/// Receives change notifications after the watcher publishes a new version.
///
/// Delivery is best-effort: the runner logs failures and moves on, since
/// the new version is already committed by the time this fires.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_change(
        &self,
        slug: &str,
        new_version: u32,
        changed_fields: &[String],
    ) -> Result<(), NotifyError>;
}

/// Notifier that discards everything. The default for tests and for
/// deployments without a delivery channel configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify_change(
        &self,
        _slug: &str,
        _new_version: u32,
        _changed_fields: &[String],
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
