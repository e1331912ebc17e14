//! Rate limiter adapters.
//!
//! - `InMemoryRateLimiter` - per-client daily counter for a single server
//!
//! ```ignore
//! let limiter = InMemoryRateLimiter::new(200).with_cleanup_probability(0.01);
//! let result = limiter.check(RateLimitKey::today("203.0.113.7")).await?;
//! ```

mod in_memory;

pub use in_memory::InMemoryRateLimiter;
