//! Remote API contract for user flow management

use crate::error::Result;
use crate::model::B2cUserFlow;
use async_trait::async_trait;
use std::time::Duration;

/// Client for the user flow collection of a directory-identity service
///
/// Implementations report a missing entity as an error for which
/// [`CloudError::is_not_found`](crate::CloudError::is_not_found) holds, and
/// any other non-success response as [`CloudError::Api`](crate::CloudError::Api)
/// carrying the HTTP status.
#[async_trait]
pub trait UserFlowApi: Send + Sync {
    /// Create a user flow; `flow.id` carries the unprefixed name
    async fn create(&self, flow: &B2cUserFlow) -> Result<B2cUserFlow>;

    /// Fetch a user flow by its identifier
    async fn get(&self, id: &str) -> Result<B2cUserFlow>;

    /// Partially update a user flow; unset fields are left untouched remotely
    async fn update(&self, flow: &B2cUserFlow) -> Result<()>;

    /// Delete a user flow by its identifier
    async fn delete(&self, id: &str) -> Result<()>;

    /// Turn the client's automatic retries off (or back on)
    fn set_retries_disabled(&self, disabled: bool);

    /// Whether automatic retries are currently disabled
    fn retries_disabled(&self) -> bool;
}

/// Retry configuration for API calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Delay to sleep after the given (zero-based) failed attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(delay as u64).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig {
            max_attempts: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10000),
            backoff_multiplier: 2.0,
        };

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(2000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(4000));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(8000));
        assert_eq!(config.delay_for_attempt(4), Duration::from_millis(10000)); // capped at max
    }
}
