//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.
//! Avoids each test module defining its own slightly-different defaults.

use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::application::{RetryPolicy, SettlementPolicy};
use crate::domain::{AccountId, GlobalConfig, MarketDefaults, UNIT};

/// Governance account used by every fixture.
pub const ADMIN: &str = "governance";

/// Settlement policy with millisecond delays so retries do not slow tests.
pub fn settlement(max_attempts: u32) -> SettlementPolicy {
    SettlementPolicy {
        retry: RetryPolicy::fixed(max_attempts, StdDuration::from_millis(1)),
        grace_period: Duration::hours(1),
        max_staleness: Duration::minutes(5),
        attempt_timeout: StdDuration::from_millis(50),
    }
}

/// Global config with the given fee and a 10% cap.
pub fn global(fee_bps: u64) -> GlobalConfig {
    match GlobalConfig::new(fee_bps, 1000, AccountId::from(ADMIN)) {
        Ok(config) => config,
        Err(e) => panic!("invalid test fee {fee_bps}: {e}"),
    }
}

/// Markets seeded with `liquidity` whole units on each side.
pub fn market_defaults(liquidity: u64) -> MarketDefaults {
    MarketDefaults {
        virtual_liquidity: liquidity * UNIT,
        min_duration: Duration::seconds(60),
    }
}
