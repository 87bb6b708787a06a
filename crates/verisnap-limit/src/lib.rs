//! # VeriSnap Limit
//!
//! Fixed-window, in-process rate limiting.
//!
//! One [`RateLimiter`] guards one operation; each caller identity gets a
//! counting bucket that resets when its window elapses. State lives in a
//! mutex-guarded map, so limits apply per process. Multi-instance
//! deployments that need a shared budget should put a shared store behind
//! the same shape instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Bucket count above which stale entries are swept on insert.
const SWEEP_THRESHOLD: usize = 5000;

/// Rejection from a limiter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimitError {
    /// The caller exhausted its budget for the current window.
    #[error("rate limit exceeded, retry in {retry_after_ms}ms")]
    RateLimited {
        /// Milliseconds until the window resets.
        retry_after_ms: u64,
    },
}

/// Millisecond clock, injectable for tests.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_millis() as u64
    }
}

struct Bucket {
    reset_at: u64,
    count: u32,
}

/// A named fixed-window rate limiter.
pub struct RateLimiter {
    name: String,
    max: u32,
    window_ms: u64,
    clock: Arc<dyn Clock>,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max` hits per `window_ms` per client.
    pub fn new(name: impl Into<String>, max: u32, window_ms: u64) -> Self {
        Self::with_clock(name, max, window_ms, Arc::new(SystemClock))
    }

    /// Create a limiter with an injected clock.
    pub fn with_clock(
        name: impl Into<String>,
        max: u32,
        window_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name: name.into(),
            max,
            window_ms,
            clock,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Count one hit for `client`, scoped to this limiter's name.
    pub fn check(&self, client: &str) -> Result<(), RateLimitError> {
        self.check_key(&format!("{}:{}", self.name, client))
    }

    /// Count one hit for a fully-qualified bucket key.
    pub fn check_key(&self, key: &str) -> Result<(), RateLimitError> {
        let now = self.clock.now_millis();
        let mut buckets = self.buckets.lock().unwrap();

        if let Some(bucket) = buckets.get_mut(key) {
            if now < bucket.reset_at {
                bucket.count += 1;
                if bucket.count > self.max {
                    return Err(RateLimitError::RateLimited {
                        retry_after_ms: bucket.reset_at - now,
                    });
                }
                return Ok(());
            }
        }

        // Fresh window. Sweeping only here keeps the hot path cheap; the
        // map can only grow on this branch.
        if buckets.len() >= SWEEP_THRESHOLD {
            buckets.retain(|_, b| now < b.reset_at);
        }
        buckets.insert(
            key.to_string(),
            Bucket {
                reset_at: now + self.window_ms,
                count: 1,
            },
        );
        Ok(())
    }
}

/// Resolve a client identity from proxy headers.
///
/// Takes the first hop of `x-forwarded-for`, then `x-real-ip`, then
/// `"unknown"`. Unidentifiable callers thus share one bucket rather than
/// escaping limits.
pub fn client_identity(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    if let Some(chain) = forwarded_for {
        if let Some(first) = chain.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(ip) = real_ip {
        let ip = ip.trim();
        if !ip.is_empty() {
            return ip.to_string();
        }
    }
    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct ManualClock {
        now: AtomicU64,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: AtomicU64::new(1_000_000),
            })
        }

        fn advance(&self, ms: u64) {
            self.now.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> u64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_allows_up_to_max_then_rejects() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock("claim", 3, 60_000, clock);

        for _ in 0..3 {
            assert!(limiter.check("1.2.3.4").is_ok());
        }
        assert!(matches!(
            limiter.check("1.2.3.4"),
            Err(RateLimitError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_window_elapse_resets_the_budget() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock("claim", 1, 60_000, clock.clone());

        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_err());

        clock.advance(60_001);
        assert!(limiter.check("1.2.3.4").is_ok());
    }

    #[test]
    fn test_clients_have_independent_budgets() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock("claim", 1, 60_000, clock);

        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_err());
        assert!(limiter.check("5.6.7.8").is_ok());
    }

    #[test]
    fn test_retry_after_counts_down() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock("claim", 1, 60_000, clock.clone());

        limiter.check("x").unwrap();
        clock.advance(10_000);
        assert_eq!(
            limiter.check("x"),
            Err(RateLimitError::RateLimited {
                retry_after_ms: 50_000
            })
        );
    }

    #[test]
    fn test_sweep_drops_stale_buckets() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock("claim", 1, 60_000, clock.clone());

        for i in 0..SWEEP_THRESHOLD {
            limiter.check(&format!("client-{}", i)).unwrap();
        }
        assert_eq!(limiter.buckets.lock().unwrap().len(), SWEEP_THRESHOLD);

        // All windows expire; the next fresh insert triggers the sweep.
        clock.advance(60_001);
        limiter.check("fresh").unwrap();
        assert_eq!(limiter.buckets.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_client_identity_prefers_first_forwarded_hop() {
        assert_eq!(
            client_identity(Some("9.9.9.9, 10.0.0.1"), Some("1.1.1.1")),
            "9.9.9.9"
        );
        assert_eq!(client_identity(Some(" 9.9.9.9 "), None), "9.9.9.9");
        assert_eq!(client_identity(None, Some("1.1.1.1")), "1.1.1.1");
        assert_eq!(client_identity(Some(""), Some("")), "unknown");
        assert_eq!(client_identity(None, None), "unknown");
    }
}
