//! Turning an oracle price into a binary outcome.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::market::Outcome;

/// Which side of the target price resolves the market YES.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// YES if the settlement price is strictly above the target.
    Above,
    /// YES if the settlement price is strictly below the target.
    Below,
}

impl Comparison {
    /// Decide the outcome for `value` against `target`. A price exactly at
    /// the target resolves NO in both directions.
    #[must_use]
    pub fn decide(self, value: u64, target: u64) -> Outcome {
        let yes = match self {
            Self::Above => value > target,
            Self::Below => value < target,
        };
        if yes {
            Outcome::Yes
        } else {
            Outcome::No
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            other => Err(format!("unknown comparison '{other}', expected above or below")),
        }
    }
}

/// A price observation from an oracle feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReading {
    pub value: u64,
    pub timestamp: DateTime<Utc>,
}

impl PriceReading {
    #[must_use]
    pub const fn new(value: u64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }

    /// A reading is fresh when it is not from the future and no older than
    /// `max_staleness` relative to `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, max_staleness: Duration) -> bool {
        self.timestamp <= now && now - self.timestamp <= max_staleness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_resolves_yes_only_strictly_over_target() {
        assert_eq!(Comparison::Above.decide(101, 100), Outcome::Yes);
        assert_eq!(Comparison::Above.decide(100, 100), Outcome::No);
        assert_eq!(Comparison::Above.decide(99, 100), Outcome::No);
    }

    #[test]
    fn below_resolves_yes_only_strictly_under_target() {
        assert_eq!(Comparison::Below.decide(99, 100), Outcome::Yes);
        assert_eq!(Comparison::Below.decide(100, 100), Outcome::No);
        assert_eq!(Comparison::Below.decide(101, 100), Outcome::No);
    }

    #[test]
    fn comparison_parses_case_insensitively() {
        assert_eq!("ABOVE".parse::<Comparison>().unwrap(), Comparison::Above);
        assert_eq!("below".parse::<Comparison>().unwrap(), Comparison::Below);
        assert!("sideways".parse::<Comparison>().is_err());
    }

    #[test]
    fn freshness_rejects_stale_and_future_readings() {
        let now = Utc::now();
        let window = Duration::seconds(60);

        assert!(PriceReading::new(1, now).is_fresh(now, window));
        assert!(PriceReading::new(1, now - Duration::seconds(60)).is_fresh(now, window));
        assert!(!PriceReading::new(1, now - Duration::seconds(61)).is_fresh(now, window));
        assert!(!PriceReading::new(1, now + Duration::seconds(1)).is_fresh(now, window));
    }
}
