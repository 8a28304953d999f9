//! Rate limiting for GitHub API writes.
//!
//! Before each write the GitHub host checks the remaining core budget and,
//! when it runs low, sleeps until the window resets.

use octocrab::Octocrab;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Maximum time to wait for rate limit reset (1 hour).
const MAX_WAIT_SECS: u64 = 3600;

/// Minimum remaining requests before proactively waiting.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Core API budget as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Unix timestamp when the window resets.
    pub reset: u64,
}

impl RateLimitInfo {
    /// How long to wait before the next request, given the current time.
    ///
    /// Returns `None` while enough requests remain or once the reset time
    /// has passed. The wait never exceeds one hour.
    #[must_use]
    pub fn wait_duration(&self, now_secs: u64) -> Option<Duration> {
        if self.remaining >= MIN_REMAINING_THRESHOLD || self.reset <= now_secs {
            return None;
        }

        let wait_secs = self.reset - now_secs;
        if wait_secs > MAX_WAIT_SECS {
            warn!(
                wait_secs,
                max_wait = MAX_WAIT_SECS,
                "Rate limit reset too far in future, capping wait time"
            );
        }
        Some(Duration::from_secs(wait_secs.min(MAX_WAIT_SECS)))
    }
}

/// Fetches the current core API budget.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: u32::try_from(core.remaining).unwrap_or(u32::MAX),
        reset: core.reset,
    })
}

/// Waits until the core budget allows another write.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    let info = check_core_rate_limit(octocrab).await?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    if let Some(wait) = info.wait_duration(now) {
        info!(
            remaining = info.remaining,
            wait_secs = wait.as_secs(),
            "Rate limit low, waiting for reset"
        );
        tokio::time::sleep(wait).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_wait_with_budget_left() {
        let info = RateLimitInfo {
            remaining: 100,
            reset: 2_000,
        };
        assert_eq!(info.wait_duration(1_000), None);
    }

    #[test]
    fn no_wait_after_reset() {
        let info = RateLimitInfo {
            remaining: 1,
            reset: 500,
        };
        assert_eq!(info.wait_duration(1_000), None);
    }

    #[test]
    fn waits_until_reset() {
        let info = RateLimitInfo {
            remaining: 2,
            reset: 1_030,
        };
        assert_eq!(info.wait_duration(1_000), Some(Duration::from_secs(30)));
    }

    #[test]
    fn caps_long_waits() {
        let info = RateLimitInfo {
            remaining: 0,
            reset: 1_000 + 2 * MAX_WAIT_SECS,
        };
        assert_eq!(
            info.wait_duration(1_000),
            Some(Duration::from_secs(MAX_WAIT_SECS))
        );
    }
}
