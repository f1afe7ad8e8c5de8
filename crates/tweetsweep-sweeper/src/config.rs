//! Configuration for destruction runs
//!
//! Defines retry limits and the waits between remote calls.

use crate::SweepError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the destruction driver
///
/// # Examples
///
/// ```
/// use tweetsweep_sweeper::DestructionConfig;
///
/// let config = DestructionConfig::default();
/// assert_eq!(config.max_transient_attempts, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestructionConfig {
    /// Attempts per item when the network or server misbehaves
    /// Default: 3
    #[serde(default = "default_max_transient_attempts")]
    pub max_transient_attempts: u32,

    /// Pause between transient retries (in milliseconds)
    /// Default: 2000
    #[serde(default = "default_transient_delay_ms")]
    pub transient_delay_ms: u64,

    /// Pause between consecutive delete requests (in milliseconds)
    /// Default: 0
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Extra wait after a rate window resets (in seconds)
    /// Default: 1
    #[serde(default = "default_rate_limit_margin_secs")]
    pub rate_limit_margin_secs: u64,
}

fn default_max_transient_attempts() -> u32 {
    3
}

fn default_transient_delay_ms() -> u64 {
    2000
}

fn default_rate_limit_margin_secs() -> u64 {
    1
}

impl Default for DestructionConfig {
    fn default() -> Self {
        Self {
            max_transient_attempts: default_max_transient_attempts(),
            transient_delay_ms: default_transient_delay_ms(),
            request_delay_ms: 0,
            rate_limit_margin_secs: default_rate_limit_margin_secs(),
        }
    }
}

impl DestructionConfig {
    /// Reject settings the driver cannot work with
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.max_transient_attempts == 0 {
            return Err(SweepError::Config(
                "max_transient_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get transient retry delay as Duration
    pub fn transient_delay(&self) -> Duration {
        Duration::from_millis(self.transient_delay_ms)
    }

    /// Get request pacing as Duration
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Get rate limit margin as Duration
    pub fn rate_limit_margin(&self) -> Duration {
        Duration::from_secs(self.rate_limit_margin_secs)
    }
}
