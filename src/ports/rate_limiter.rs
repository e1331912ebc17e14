//! Rate limiting port for capping model spend per client.
//!
//! The limiter counts requests per client per UTC calendar day. Each request
//! increments its counter exactly once; stale days are swept opportunistically
//! by the implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

/// Port for daily request quotas.
///
/// Implementations should be thread-safe and support concurrent access.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request against the key, reporting whether it is within quota.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;
}

/// Client fallback when no address is known.
pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// A client on a given day.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    /// Client identifier, usually an IP address.
    pub client: String,
    /// UTC calendar day.
    pub day: NaiveDate,
}

impl RateLimitKey {
    pub fn new(client: impl Into<String>, day: NaiveDate) -> Self {
        let client = client.into();
        let client = if client.trim().is_empty() {
            ANONYMOUS_CLIENT.to_string()
        } else {
            client.trim().to_string()
        };
        Self { client, day }
    }

    /// Key for the client on the current UTC day.
    pub fn today(client: impl Into<String>) -> Self {
        Self::new(client, chrono::Utc::now().date_naive())
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.client, self.day)
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitStatus),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }

    pub fn status(&self) -> &RateLimitStatus {
        match self {
            RateLimitResult::Allowed(status) | RateLimitResult::Denied(status) => status,
        }
    }
}

/// Quota status for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Requests allowed per day.
    pub limit: u32,
    /// Requests counted so far today, including denied ones.
    pub used: u32,
}

impl RateLimitStatus {
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}
