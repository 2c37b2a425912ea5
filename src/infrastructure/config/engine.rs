//! Fee, governance and market-creation settings.

use serde::Deserialize;

use super::settlement::seconds;
use crate::domain::{AccountId, GlobalConfig, MarketDefaults, UNIT};
use crate::error::EngineError;

/// Trading fee configuration, in basis points.
#[derive(Debug, Clone, Deserialize)]
pub struct FeesConfig {
    /// Fee charged on every trade (10 = 0.1%).
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u64,
    /// Highest fee governance may set.
    #[serde(default = "default_max_fee_bps")]
    pub max_fee_bps: u64,
}

fn default_fee_bps() -> u64 {
    10
}

fn default_max_fee_bps() -> u64 {
    1000 // 10%
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self {
            fee_bps: default_fee_bps(),
            max_fee_bps: default_max_fee_bps(),
        }
    }
}

/// Who may change fees, pause trading and override outcomes.
#[derive(Debug, Clone, Deserialize)]
pub struct GovernanceConfig {
    #[serde(default = "default_admin")]
    pub admin: String,
}

fn default_admin() -> String {
    "governance".into()
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
        }
    }
}

/// Parameters applied to newly created markets.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsConfig {
    /// Virtual shares seeded on each side of the curve (6 decimals).
    #[serde(default = "default_virtual_liquidity")]
    pub virtual_liquidity: u64,
    /// Shortest allowed time from creation to deadline.
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: u64,
}

fn default_virtual_liquidity() -> u64 {
    100 * UNIT
}

fn default_min_duration_secs() -> u64 {
    60
}

impl Default for MarketsConfig {
    fn default() -> Self {
        Self {
            virtual_liquidity: default_virtual_liquidity(),
            min_duration_secs: default_min_duration_secs(),
        }
    }
}

impl MarketsConfig {
    #[must_use]
    pub fn defaults(&self) -> MarketDefaults {
        MarketDefaults {
            virtual_liquidity: self.virtual_liquidity,
            min_duration: seconds(self.min_duration_secs),
        }
    }
}

/// Build the governance-controlled global configuration.
///
/// # Errors
///
/// `InvalidFee` if the fee exceeds its cap or the cap exceeds 100%.
pub fn global_config(
    fees: &FeesConfig,
    governance: &GovernanceConfig,
) -> Result<GlobalConfig, EngineError> {
    GlobalConfig::new(
        fees.fee_bps,
        fees.max_fee_bps,
        AccountId::new(governance.admin.clone()),
    )
}
