//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all engine settings.
//! Every section is optional; a missing section takes its defaults.
//!
//! # Example
//!
//! ```no_run
//! use outcome_amm::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::engine::{global_config, FeesConfig, GovernanceConfig, MarketsConfig};
use super::logging::LoggingConfig;
use super::settlement::SettlementConfig;
use crate::application::SettlementPolicy;
use crate::domain::{GlobalConfig, MarketDefaults, BPS_DENOMINATOR};
use crate::error::{ConfigError, Result};

/// Longest duration any setting may express.
const MAX_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fees: FeesConfig,

    #[serde(default)]
    pub governance: GovernanceConfig,

    #[serde(default)]
    pub markets: MarketsConfig,

    #[serde(default)]
    pub settlement: SettlementConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.fees.max_fee_bps > BPS_DENOMINATOR {
            return Err(invalid("max_fee_bps", format!("must be at most {BPS_DENOMINATOR}")));
        }
        if self.fees.fee_bps > self.fees.max_fee_bps {
            return Err(invalid(
                "fee_bps",
                format!("must not exceed max_fee_bps ({})", self.fees.max_fee_bps),
            ));
        }
        if self.governance.admin.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "admin" }.into());
        }
        if self.markets.virtual_liquidity == 0 {
            return Err(invalid("virtual_liquidity", "must be greater than 0"));
        }
        for (field, secs) in [
            ("min_duration_secs", self.markets.min_duration_secs),
            ("grace_period_secs", self.settlement.grace_period_secs),
            ("max_staleness_secs", self.settlement.max_staleness_secs),
        ] {
            if secs > MAX_DURATION_SECS {
                return Err(invalid(field, "must be at most ten years"));
            }
        }
        if self.settlement.attempt_timeout_ms == 0 {
            return Err(invalid("attempt_timeout_ms", "must be greater than 0"));
        }

        let retry = &self.settlement.retry;
        if retry.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        if retry.backoff_multiplier.is_nan() || retry.backoff_multiplier < 1.0 {
            return Err(invalid("backoff_multiplier", "must be at least 1.0"));
        }
        if retry.initial_delay_ms > retry.max_delay_ms {
            return Err(invalid(
                "initial_delay_ms",
                format!("must not exceed max_delay_ms ({})", retry.max_delay_ms),
            ));
        }

        if !self.logging.is_known_format() {
            return Err(invalid("format", "must be \"pretty\" or \"json\""));
        }

        Ok(())
    }

    /// Governance state the registry starts from.
    ///
    /// # Errors
    ///
    /// Unreachable for a validated config; kept fallible because the
    /// conversion re-checks the fee cap.
    pub fn global_config(&self) -> Result<GlobalConfig> {
        Ok(global_config(&self.fees, &self.governance)?)
    }

    #[must_use]
    pub fn market_defaults(&self) -> MarketDefaults {
        self.markets.defaults()
    }

    #[must_use]
    pub fn settlement_policy(&self) -> SettlementPolicy {
        self.settlement.policy()
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}
