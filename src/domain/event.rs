//! Lifecycle events published after successful operations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::{AccountId, MarketId, PositionId};
use super::market::{Category, Outcome};
use super::trade::{Redemption, TradeReceipt};

/// How a market's outcome was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Compared an oracle reading against the target price.
    Oracle { value: u64 },
    /// Set by governance after the oracle failed to deliver.
    Override,
}

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    MarketCreated {
        market_id: MarketId,
        name: String,
        category: Category,
        creator: AccountId,
        deadline: DateTime<Utc>,
        fee_bps: u64,
    },
    SharesBought {
        market_id: MarketId,
        receipt: TradeReceipt,
    },
    SharesSold {
        market_id: MarketId,
        receipt: TradeReceipt,
    },
    MarketResolved {
        market_id: MarketId,
        outcome: Outcome,
        source: ResolutionSource,
    },
    PositionRedeemed {
        market_id: MarketId,
        position_id: PositionId,
        owner: AccountId,
        payout: u64,
    },
    TradingPaused {
        paused: bool,
    },
    FeeUpdated {
        fee_bps: u64,
    },
}

impl Event {
    /// Market the event concerns, if any.
    #[must_use]
    pub fn market_id(&self) -> Option<&MarketId> {
        match self {
            Self::MarketCreated { market_id, .. }
            | Self::SharesBought { market_id, .. }
            | Self::SharesSold { market_id, .. }
            | Self::MarketResolved { market_id, .. }
            | Self::PositionRedeemed { market_id, .. } => Some(market_id),
            Self::TradingPaused { .. } | Self::FeeUpdated { .. } => None,
        }
    }

    pub(crate) fn redeemed(redemption: &Redemption) -> Self {
        Self::PositionRedeemed {
            market_id: redemption.position.market_id().clone(),
            position_id: redemption.position.id(),
            owner: redemption.position.owner().clone(),
            payout: redemption.payout,
        }
    }

    /// Short event name, matching the serialized tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MarketCreated { .. } => "market_created",
            Self::SharesBought { .. } => "shares_bought",
            Self::SharesSold { .. } => "shares_sold",
            Self::MarketResolved { .. } => "market_resolved",
            Self::PositionRedeemed { .. } => "position_redeemed",
            Self::TradingPaused { .. } => "trading_paused",
            Self::FeeUpdated { .. } => "fee_updated",
        }
    }
}
