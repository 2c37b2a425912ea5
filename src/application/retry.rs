//! Retry schedule for oracle queries during settlement.

use std::time::Duration;

use serde::Deserialize;

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Wait `initial_delay_ms` between every attempt.
    Fixed,
    /// Multiply the delay by `backoff_multiplier` after each failure.
    #[default]
    Exponential,
}

/// Bounded retry policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay after the first failed attempt (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound on any single delay (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default)]
    pub strategy: BackoffStrategy,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000 // 1 second
}

fn default_max_delay_ms() -> u64 {
    10000 // 10 seconds
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            strategy: BackoffStrategy::default(),
        }
    }
}

impl RetryPolicy {
    /// A fixed-delay policy.
    #[must_use]
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Self {
            max_attempts,
            initial_delay_ms: delay_ms,
            max_delay_ms: delay_ms,
            backoff_multiplier: 1.0,
            strategy: BackoffStrategy::Fixed,
        }
    }

    /// Delay to wait after the `attempt`-th failure (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let ms = match self.strategy {
            BackoffStrategy::Fixed => self.initial_delay_ms,
            BackoffStrategy::Exponential => {
                let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
                let scaled = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
                // `as` saturates for out-of-range floats
                scaled as u64
            }
        };
        Duration::from_millis(ms.min(self.max_delay_ms))
    }

    /// Delays between consecutive attempts; one fewer than `max_attempts`.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..self.max_attempts).map(|attempt| self.delay_for(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_delays_double_until_capped() {
        let policy = RetryPolicy {
            max_attempts: 6,
            initial_delay_ms: 1000,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            strategy: BackoffStrategy::Exponential,
        };
        let delays: Vec<u64> = policy
            .schedule()
            .map(|d| u64::try_from(d.as_millis()).unwrap())
            .collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 5000, 5000]);
    }

    #[test]
    fn fixed_policy_repeats_delay() {
        let policy = RetryPolicy::fixed(3, Duration::from_secs(1));
        let delays: Vec<Duration> = policy.schedule().collect();
        assert_eq!(delays, vec![Duration::from_secs(1); 2]);
    }

    #[test]
    fn single_attempt_has_no_delays() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.schedule().count(), 0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let policy: RetryPolicy = toml::from_str("strategy = \"fixed\"").unwrap();
        assert_eq!(policy.strategy, BackoffStrategy::Fixed);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay_ms, 1000);
    }
}
