//! In-memory daily rate limiter.
//!
//! Counts requests per (client, UTC day) in a HashMap. Entries for past days
//! are swept on a small random fraction of calls instead of on a timer.
//! Not shared across processes.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::ports::{RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

/// In-memory limiter for single-server deployments and tests.
#[derive(Debug, Clone)]
pub struct InMemoryRateLimiter {
    daily_limit: u32,
    cleanup_probability: f64,
    counts: Arc<RwLock<HashMap<RateLimitKey, u32>>>,
}

impl InMemoryRateLimiter {
    pub fn new(daily_limit: u32) -> Self {
        Self {
            daily_limit,
            cleanup_probability: 0.01,
            counts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fraction of calls that also sweep stale days; clamped into 0..=1.
    pub fn with_cleanup_probability(mut self, probability: f64) -> Self {
        self.cleanup_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Number of tracked (client, day) entries.
    pub async fn tracked_keys(&self) -> usize {
        self.counts.read().await.len()
    }

    /// Drops every entry older than `today`.
    pub async fn sweep_before(&self, today: NaiveDate) -> usize {
        let mut counts = self.counts.write().await;
        let before = counts.len();
        counts.retain(|key, _| key.day >= today);
        before - counts.len()
    }

    fn should_sweep(&self) -> bool {
        self.cleanup_probability > 0.0 && rand::thread_rng().gen_bool(self.cleanup_probability)
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        if self.should_sweep() {
            let removed = self.sweep_before(Utc::now().date_naive()).await;
            let remaining = self.tracked_keys().await;
            debug!(
                removed,
                remaining,
                "swept stale rate limit entries"
            );
        }

        let mut counts = self.counts.write().await;
        let used = counts.entry(key).or_insert(0);
        *used = used.saturating_add(1);

        let status = RateLimitStatus {
            limit: self.daily_limit,
            used: *used,
        };

        if status.used > self.daily_limit {
            Ok(RateLimitResult::Denied(status))
        } else {
            Ok(RateLimitResult::Allowed(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn limiter(limit: u32) -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(limit).with_cleanup_probability(0.0)
    }

    #[tokio::test]
    async fn allows_up_to_limit_then_denies() {
        let limiter = limiter(2);
        let key = RateLimitKey::new("10.0.0.1", day(1));

        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        let third = limiter.check(key.clone()).await.unwrap();
        assert!(third.is_denied());
        assert_eq!(third.status().used, 3);
        assert_eq!(third.status().remaining(), 0);
    }

    #[tokio::test]
    async fn clients_and_days_are_counted_separately() {
        let limiter = limiter(1);

        assert!(limiter.check(RateLimitKey::new("a", day(1))).await.unwrap().is_allowed());
        assert!(limiter.check(RateLimitKey::new("b", day(1))).await.unwrap().is_allowed());
        assert!(limiter.check(RateLimitKey::new("a", day(2))).await.unwrap().is_allowed());
        assert!(limiter.check(RateLimitKey::new("a", day(1))).await.unwrap().is_denied());
    }

    #[tokio::test]
    async fn sweep_removes_only_past_days() {
        let limiter = limiter(10);
        limiter.check(RateLimitKey::new("a", day(1))).await.unwrap();
        limiter.check(RateLimitKey::new("b", day(2))).await.unwrap();
        limiter.check(RateLimitKey::new("c", day(3))).await.unwrap();

        assert_eq!(limiter.sweep_before(day(3)).await, 2);
        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[tokio::test]
    async fn certain_cleanup_drops_stale_entries_on_check() {
        let limiter = InMemoryRateLimiter::new(10).with_cleanup_probability(1.0);
        limiter.check(RateLimitKey::new("old", day(1))).await.unwrap();
        limiter.check(RateLimitKey::today("new")).await.unwrap();

        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[test]
    fn cleanup_probability_is_clamped() {
        let limiter = InMemoryRateLimiter::new(1).with_cleanup_probability(3.0);
        assert_eq!(limiter.cleanup_probability, 1.0);
    }
}
