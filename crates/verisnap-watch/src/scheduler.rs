//! Adaptive watch cadence.
//!
//! Young contracts change often and get checked every few hours; settled
//! ones taper off to monthly. Contracts that can still be mutated by an
//! admin never taper past weekly, no matter how old they are.

use chrono::{DateTime, Duration, Utc};

/// Compute how long to wait between checks for a project of the given age.
pub fn check_interval(age: Duration, risky: bool) -> Duration {
    let base = if age <= Duration::days(30) {
        Duration::hours(6)
    } else if age <= Duration::days(90) {
        Duration::hours(48)
    } else if age <= Duration::days(180) {
        Duration::days(7)
    } else {
        Duration::days(30)
    };

    if risky {
        if age > Duration::days(180) {
            // Never taper a mutable contract past weekly.
            Duration::days(7)
        } else {
            base.min(Duration::hours(48))
        }
    } else {
        base
    }
}

/// Decide whether a project is due for a check.
///
/// A project with no prior run is always due. Pure in `now` so the policy
/// is testable without a clock.
pub fn is_due(
    created_at: DateTime<Utc>,
    risky: bool,
    last_run_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    let Some(last) = last_run_at else {
        return true;
    };
    let interval = check_interval(now - created_at, risky);
    now - last >= interval
}
