//! Settlement timing and oracle retry configuration.

use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::Deserialize;

use crate::application::{RetryPolicy, SettlementPolicy};

#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Seconds after the deadline before governance may override.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
    /// Oldest acceptable oracle reading, in seconds.
    #[serde(default = "default_max_staleness_secs")]
    pub max_staleness_secs: u64,
    /// Timeout for a single oracle call (milliseconds).
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_grace_period_secs() -> u64 {
    3600 // 1 hour
}

fn default_max_staleness_secs() -> u64 {
    300 // 5 minutes
}

fn default_attempt_timeout_ms() -> u64 {
    5000
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period_secs(),
            max_staleness_secs: default_max_staleness_secs(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            retry: RetryPolicy::default(),
        }
    }
}

impl SettlementConfig {
    #[must_use]
    pub fn policy(&self) -> SettlementPolicy {
        SettlementPolicy {
            retry: self.retry.clone(),
            grace_period: seconds(self.grace_period_secs),
            max_staleness: seconds(self.max_staleness_secs),
            attempt_timeout: StdDuration::from_millis(self.attempt_timeout_ms),
        }
    }
}

pub(crate) fn seconds(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
