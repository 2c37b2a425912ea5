//! Governance-controlled engine settings.

use chrono::Duration;
use serde::Serialize;

use super::id::AccountId;
use super::money::{BPS_DENOMINATOR, UNIT};
use crate::error::EngineError;

/// Global settings read when markets are created and trades are admitted.
///
/// Markets copy `fee_bps` at creation, so later fee changes only affect
/// markets created afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalConfig {
    fee_bps: u64,
    max_fee_bps: u64,
    admin: AccountId,
    trading_paused: bool,
}

impl GlobalConfig {
    /// # Errors
    ///
    /// `InvalidFee` if `fee_bps > max_fee_bps` or the cap exceeds 100%.
    pub fn new(fee_bps: u64, max_fee_bps: u64, admin: AccountId) -> Result<Self, EngineError> {
        if max_fee_bps > BPS_DENOMINATOR {
            return Err(EngineError::InvalidFee {
                fee_bps: max_fee_bps,
                max_fee_bps: BPS_DENOMINATOR,
            });
        }
        if fee_bps > max_fee_bps {
            return Err(EngineError::InvalidFee {
                fee_bps,
                max_fee_bps,
            });
        }
        Ok(Self {
            fee_bps,
            max_fee_bps,
            admin,
            trading_paused: false,
        })
    }

    #[must_use]
    pub const fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    #[must_use]
    pub const fn max_fee_bps(&self) -> u64 {
        self.max_fee_bps
    }

    #[must_use]
    pub const fn admin(&self) -> &AccountId {
        &self.admin
    }

    #[must_use]
    pub const fn trading_paused(&self) -> bool {
        self.trading_paused
    }

    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the admin.
    pub fn authorize(&self, caller: &AccountId, action: &'static str) -> Result<(), EngineError> {
        if caller == &self.admin {
            Ok(())
        } else {
            Err(EngineError::Unauthorized { action })
        }
    }

    pub(crate) fn set_fee_bps(&mut self, fee_bps: u64) -> Result<(), EngineError> {
        if fee_bps > self.max_fee_bps {
            return Err(EngineError::InvalidFee {
                fee_bps,
                max_fee_bps: self.max_fee_bps,
            });
        }
        self.fee_bps = fee_bps;
        Ok(())
    }

    pub(crate) fn set_trading_paused(&mut self, paused: bool) {
        self.trading_paused = paused;
    }
}

/// Parameters applied to every new market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketDefaults {
    /// Virtual shares seeded on each side of the curve.
    pub virtual_liquidity: u64,
    /// Shortest allowed time between creation and deadline.
    pub min_duration: Duration,
}

impl Default for MarketDefaults {
    fn default() -> Self {
        Self {
            virtual_liquidity: 100 * UNIT,
            min_duration: Duration::seconds(60),
        }
    }
}
