//! Rate limit configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Per-client daily quota
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Requests per client per UTC day
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    /// Fraction of requests that also sweep stale days
    #[serde(default = "default_cleanup_probability")]
    pub cleanup_probability: f64,
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.cleanup_probability) {
            return Err(ValidationError::InvalidProbability("cleanup_probability"));
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            daily_limit: default_daily_limit(),
            cleanup_probability: default_cleanup_probability(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_daily_limit() -> u32 {
    200
}

fn default_cleanup_probability() -> f64 {
    0.01
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.daily_limit, 200);
        assert_eq!(config.cleanup_probability, 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_probability_out_of_range() {
        let config = RateLimitConfig {
            cleanup_probability: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
