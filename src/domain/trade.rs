//! Results of trades and redemptions.

use serde::Serialize;

use super::curve::Prices;
use super::id::AccountId;
use super::market::Outcome;
use super::position::{Position, PositionRef};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// Outcome of an executed buy or sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeReceipt {
    pub side: Side,
    pub trader: AccountId,
    pub position: PositionRef,
    pub outcome: Outcome,
    pub shares: u64,
    /// Collateral paid (buy, fee included) or received (sell, fee withheld).
    pub amount: u64,
    pub fee: u64,
    /// Shares left in the position; zero means it was destroyed.
    pub position_shares: u64,
    pub prices_after: Prices,
}

/// Outcome of redeeming a position after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redemption {
    /// The consumed position as it was before redemption.
    pub position: Position,
    /// Zero for a losing position.
    pub payout: u64,
}

impl Redemption {
    #[must_use]
    pub fn won(&self) -> bool {
        self.payout > 0
    }
}
