//! Market-related domain types.
//!
//! - [`Market`] - A binary market: curve state, pooled collateral, positions
//! - [`Outcome`] - The two tradeable sides, YES and NO
//! - [`Category`] - Listing category used for indexing
//! - [`NewMarket`] - Parameters for creating a market
//!
//! A market moves through `Open -> AwaitingResolution -> Resolved`. Trading
//! happens only while `Open`, resolution only from `AwaitingResolution`, and
//! redemption only once `Resolved`. Every mutating method validates the whole
//! operation first, then runs the caller's payment step, then applies the
//! state change, so a failure at any point leaves the market untouched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::MarketDefaults;
use super::curve::{BondingCurve, BuyQuote, Prices, Reserves, SellQuote};
use super::id::{AccountId, MarketId, PositionId};
use super::math::{checked_add, checked_sub};
use super::oracle::Comparison;
use super::position::{Position, PositionBook, PositionRef};
use super::trade::{Redemption, Side, TradeReceipt};
use crate::error::EngineError;

/// One side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    /// Wire code: NO is 0, YES is 1.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::No => 0,
            Self::Yes => 1,
        }
    }
}

impl TryFrom<u8> for Outcome {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::No),
            1 => Ok(Self::Yes),
            other => Err(EngineError::invalid_amount(format!("unknown outcome code {other}"))),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(format!("unknown outcome '{other}', expected yes or no")),
        }
    }
}

/// Listing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Crypto,
    Stocks,
    Assets,
    Economics,
    Indexes,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Crypto,
        Self::Stocks,
        Self::Assets,
        Self::Economics,
        Self::Indexes,
    ];

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Crypto => 0,
            Self::Stocks => 1,
            Self::Assets => 2,
            Self::Economics => 3,
            Self::Indexes => 4,
        }
    }
}

impl TryFrom<u8> for Category {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| EngineError::invalid_market(format!("unknown category code {code}")))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Crypto => "crypto",
            Self::Stocks => "stocks",
            Self::Assets => "assets",
            Self::Economics => "economics",
            Self::Indexes => "indexes",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.to_string() == lower)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Settlement state of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Unresolved,
    Yes,
    No,
}

impl Resolution {
    /// The winning outcome, once resolved.
    #[must_use]
    pub const fn winner(self) -> Option<Outcome> {
        match self {
            Self::Unresolved => None,
            Self::Yes => Some(Outcome::Yes),
            Self::No => Some(Outcome::No),
        }
    }

    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl From<Outcome> for Resolution {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Yes => Self::Yes,
            Outcome::No => Self::No,
        }
    }
}

/// Lifecycle phase, derived from the clock and the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPhase {
    Open,
    AwaitingResolution,
    Resolved,
}

/// Proof that the caller is the settlement engine.
///
/// Only code inside this crate can construct one, which keeps
/// [`Market::resolve`] out of reach of traders and UI layers.
#[derive(Debug)]
pub struct ResolutionAuthority {
    _private: (),
}

impl ResolutionAuthority {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

/// Parameters for creating a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMarket {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub category: Category,
    pub deadline: DateTime<Utc>,
    /// Oracle feed to settle against; the market name is used when empty.
    #[serde(default)]
    pub price_identifier: String,
    pub target_price: u64,
    pub comparison: Comparison,
}

impl NewMarket {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        deadline: DateTime<Utc>,
        target_price: u64,
        comparison: Comparison,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            image_url: String::new(),
            category,
            deadline,
            price_identifier: String::new(),
            target_price,
            comparison,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    #[must_use]
    pub fn with_price_identifier(mut self, price_identifier: impl Into<String>) -> Self {
        self.price_identifier = price_identifier.into();
        self
    }
}

/// Shares held by positions on each side; the market's worst-case liability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Outstanding {
    pub yes: u64,
    pub no: u64,
}

impl Outstanding {
    #[must_use]
    pub const fn of(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.yes,
            Outcome::No => self.no,
        }
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        self.yes.max(self.no)
    }

    fn with(mut self, outcome: Outcome, shares: u64) -> Self {
        match outcome {
            Outcome::Yes => self.yes = shares,
            Outcome::No => self.no = shares,
        }
        self
    }
}

/// Read-only summary of a market, without its positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketSnapshot {
    pub id: MarketId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category: Category,
    pub creator: AccountId,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub price_identifier: String,
    pub target_price: u64,
    pub comparison: Comparison,
    pub fee_bps: u64,
    pub reserves: Reserves,
    pub prices: Prices,
    pub collateral_balance: u64,
    pub fees_collected: u64,
    pub outstanding: Outstanding,
    pub resolution: Resolution,
    pub resolved_at: Option<DateTime<Utc>>,
    pub phase: MarketPhase,
    pub open_positions: usize,
}

/// A binary prediction market priced by a [`BondingCurve`].
#[derive(Debug, Clone)]
pub struct Market {
    id: MarketId,
    creator: AccountId,
    terms: NewMarket,
    created_at: DateTime<Utc>,
    fee_bps: u64,
    reserves: Reserves,
    collateral_balance: u64,
    fees_collected: u64,
    outstanding: Outstanding,
    resolution: Resolution,
    resolved_at: Option<DateTime<Utc>>,
    positions: PositionBook,
}

impl Market {
    /// Create a market seeded with balanced virtual reserves.
    ///
    /// # Errors
    ///
    /// `InvalidMarket` if the name is blank, the target price is zero, the
    /// deadline is closer than `defaults.min_duration`, or the virtual
    /// liquidity is zero.
    pub fn new(
        id: MarketId,
        creator: AccountId,
        terms: NewMarket,
        defaults: &MarketDefaults,
        fee_bps: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        if terms.name.trim().is_empty() {
            return Err(EngineError::invalid_market("name cannot be empty"));
        }
        if terms.target_price == 0 {
            return Err(EngineError::invalid_market("target price must be positive"));
        }
        let earliest = now.checked_add_signed(defaults.min_duration);
        if earliest.map_or(true, |earliest| terms.deadline < earliest) {
            return Err(EngineError::invalid_market(format!(
                "deadline {} must be at least {}s after {}",
                terms.deadline,
                defaults.min_duration.num_seconds(),
                now
            )));
        }
        let reserves = Reserves::balanced(defaults.virtual_liquidity)?;

        Ok(Self {
            id,
            creator,
            terms,
            created_at: now,
            fee_bps,
            reserves,
            collateral_balance: 0,
            fees_collected: 0,
            outstanding: Outstanding::default(),
            resolution: Resolution::Unresolved,
            resolved_at: None,
            positions: PositionBook::new(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> &MarketId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.terms.name
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.terms.category
    }

    #[must_use]
    pub const fn creator(&self) -> &AccountId {
        &self.creator
    }

    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.terms.deadline
    }

    #[must_use]
    pub const fn target_price(&self) -> u64 {
        self.terms.target_price
    }

    #[must_use]
    pub const fn comparison(&self) -> Comparison {
        self.terms.comparison
    }

    /// Oracle feed this market settles against.
    #[must_use]
    pub fn price_identifier(&self) -> &str {
        if self.terms.price_identifier.is_empty() {
            &self.terms.name
        } else {
            &self.terms.price_identifier
        }
    }

    #[must_use]
    pub const fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    #[must_use]
    pub const fn reserves(&self) -> Reserves {
        self.reserves
    }

    #[must_use]
    pub const fn collateral_balance(&self) -> u64 {
        self.collateral_balance
    }

    #[must_use]
    pub const fn fees_collected(&self) -> u64 {
        self.fees_collected
    }

    #[must_use]
    pub const fn outstanding(&self) -> Outstanding {
        self.outstanding
    }

    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolution.is_resolved()
    }

    #[must_use]
    pub const fn positions(&self) -> &PositionBook {
        &self.positions
    }

    #[must_use]
    pub fn phase(&self, now: DateTime<Utc>) -> MarketPhase {
        if self.resolution.is_resolved() {
            MarketPhase::Resolved
        } else if now >= self.terms.deadline {
            MarketPhase::AwaitingResolution
        } else {
            MarketPhase::Open
        }
    }

    /// # Errors
    ///
    /// `ArithmeticOverflow` only for reserves near `u64::MAX`.
    pub fn prices(&self) -> Result<Prices, EngineError> {
        BondingCurve::prices(&self.reserves)
    }

    /// # Errors
    ///
    /// See [`BondingCurve::quote_buy`].
    pub fn quote_buy(&self, outcome: Outcome, shares: u64) -> Result<BuyQuote, EngineError> {
        BondingCurve::quote_buy(&self.reserves, outcome, shares, self.fee_bps)
    }

    /// # Errors
    ///
    /// See [`BondingCurve::quote_sell`].
    pub fn quote_sell(&self, outcome: Outcome, shares: u64) -> Result<SellQuote, EngineError> {
        BondingCurve::quote_sell(&self.reserves, outcome, shares, self.fee_bps)
    }

    /// # Errors
    ///
    /// `ArithmeticOverflow` only for reserves near `u64::MAX`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<MarketSnapshot, EngineError> {
        Ok(MarketSnapshot {
            id: self.id.clone(),
            name: self.terms.name.clone(),
            description: self.terms.description.clone(),
            image_url: self.terms.image_url.clone(),
            category: self.terms.category,
            creator: self.creator.clone(),
            created_at: self.created_at,
            deadline: self.terms.deadline,
            price_identifier: self.price_identifier().to_string(),
            target_price: self.terms.target_price,
            comparison: self.terms.comparison,
            fee_bps: self.fee_bps,
            reserves: self.reserves,
            prices: self.prices()?,
            collateral_balance: self.collateral_balance,
            fees_collected: self.fees_collected,
            outstanding: self.outstanding,
            resolution: self.resolution,
            resolved_at: self.resolved_at,
            phase: self.phase(now),
            open_positions: self.positions.len(),
        })
    }

    /// Buy `shares` of `outcome`, creating or growing the trader's position.
    ///
    /// `pay` receives the final quote and must move `quote.total` from the
    /// trader into the pool; it runs after all validation and before any
    /// state changes.
    ///
    /// # Errors
    ///
    /// `MarketClosed`, `InvalidAmount`, `InsufficientLiquidity`,
    /// `SlippageExceeded`, `ArithmeticOverflow`, or whatever `pay` returns.
    pub fn buy<F>(
        &mut self,
        trader: &AccountId,
        outcome: Outcome,
        shares: u64,
        max_payment: u64,
        now: DateTime<Utc>,
        pay: F,
    ) -> Result<TradeReceipt, EngineError>
    where
        F: FnOnce(&BuyQuote) -> Result<(), EngineError>,
    {
        self.ensure_open(now)?;
        if shares == 0 {
            return Err(EngineError::invalid_amount("shares must be positive"));
        }

        let quote = self.quote_buy(outcome, shares)?;
        if quote.total > max_payment {
            return Err(EngineError::SlippageExceeded {
                cost: quote.total,
                max_payment,
            });
        }

        let held = self.positions.find(trader, outcome).map_or(0, Position::shares);
        let position_shares = checked_add(held, shares)?;
        let collateral_balance = checked_add(self.collateral_balance, quote.total)?;
        let fees_collected = checked_add(self.fees_collected, quote.fee)?;
        let outstanding = self
            .outstanding
            .with(outcome, checked_add(self.outstanding.of(outcome), shares)?);
        ensure_solvent(collateral_balance, outstanding)?;
        let prices_after = BondingCurve::prices(&quote.reserves_after)?;

        pay(&quote)?;

        self.reserves = quote.reserves_after;
        self.collateral_balance = collateral_balance;
        self.fees_collected = fees_collected;
        self.outstanding = outstanding;
        let position_id = self
            .positions
            .upsert(&self.id, trader, outcome, position_shares, now);

        Ok(TradeReceipt {
            side: Side::Buy,
            trader: trader.clone(),
            position: PositionRef::new(self.id.clone(), position_id),
            outcome,
            shares,
            amount: quote.total,
            fee: quote.fee,
            position_shares,
            prices_after,
        })
    }

    /// Buy more shares into an existing position.
    ///
    /// # Errors
    ///
    /// `PositionNotFound`, `NotPositionOwner`, then everything [`Market::buy`]
    /// can return.
    pub fn add_to_position<F>(
        &mut self,
        trader: &AccountId,
        position_id: PositionId,
        shares: u64,
        max_payment: u64,
        now: DateTime<Utc>,
        pay: F,
    ) -> Result<TradeReceipt, EngineError>
    where
        F: FnOnce(&BuyQuote) -> Result<(), EngineError>,
    {
        let outcome = self.owned_position(trader, position_id)?.outcome();
        self.buy(trader, outcome, shares, max_payment, now, pay)
    }

    /// Sell `shares` from a position back to the curve.
    ///
    /// `pay_out` receives the net proceeds and must move them from the pool
    /// to the trader. The position is destroyed when it reaches zero shares.
    ///
    /// # Errors
    ///
    /// `AlreadyResolved`, `MarketClosed`, `PositionNotFound`,
    /// `NotPositionOwner`, `InvalidAmount`, `InsufficientShares`,
    /// `InsufficientLiquidity`, or whatever `pay_out` returns.
    pub fn sell<F>(
        &mut self,
        trader: &AccountId,
        position_id: PositionId,
        shares: u64,
        now: DateTime<Utc>,
        pay_out: F,
    ) -> Result<TradeReceipt, EngineError>
    where
        F: FnOnce(u64) -> Result<(), EngineError>,
    {
        if self.is_resolved() {
            return Err(EngineError::AlreadyResolved {
                market_id: self.id.clone(),
            });
        }
        self.ensure_open(now)?;

        let position = self.owned_position(trader, position_id)?;
        let outcome = position.outcome();
        let held = position.shares();
        if shares == 0 {
            return Err(EngineError::invalid_amount("shares must be positive"));
        }
        if shares > held {
            return Err(EngineError::InsufficientShares {
                requested: shares,
                held,
            });
        }

        let quote = self.quote_sell(outcome, shares)?;
        let collateral_balance = self
            .collateral_balance
            .checked_sub(quote.net)
            .ok_or_else(|| EngineError::liquidity("pool cannot cover sell proceeds"))?;
        let fees_collected = checked_add(self.fees_collected, quote.fee)?;
        let outstanding = self
            .outstanding
            .with(outcome, checked_sub(self.outstanding.of(outcome), shares)?);
        ensure_solvent(collateral_balance, outstanding)?;
        let prices_after = BondingCurve::prices(&quote.reserves_after)?;

        pay_out(quote.net)?;

        let position_shares = held - shares;
        self.reserves = quote.reserves_after;
        self.collateral_balance = collateral_balance;
        self.fees_collected = fees_collected;
        self.outstanding = outstanding;
        self.positions.set_shares(position_id, position_shares);

        Ok(TradeReceipt {
            side: Side::Sell,
            trader: trader.clone(),
            position: PositionRef::new(self.id.clone(), position_id),
            outcome,
            shares,
            amount: quote.net,
            fee: quote.fee,
            position_shares,
            prices_after,
        })
    }

    /// Record the winning outcome. One-way; callable once the deadline has
    /// passed and only with a [`ResolutionAuthority`].
    ///
    /// # Errors
    ///
    /// `AlreadyResolved` on a repeat call, `TooEarly` before the deadline.
    pub fn resolve(
        &mut self,
        outcome: Outcome,
        now: DateTime<Utc>,
        _authority: &ResolutionAuthority,
    ) -> Result<(), EngineError> {
        match self.phase(now) {
            MarketPhase::Resolved => Err(EngineError::AlreadyResolved {
                market_id: self.id.clone(),
            }),
            MarketPhase::Open => Err(EngineError::TooEarly {
                market_id: self.id.clone(),
            }),
            MarketPhase::AwaitingResolution => {
                self.resolution = outcome.into();
                self.resolved_at = Some(now);
                Ok(())
            }
        }
    }

    /// Consume a position after resolution, paying one collateral unit per
    /// share if it holds the winning outcome and nothing otherwise.
    ///
    /// `pay_out` receives the payout (possibly zero).
    ///
    /// # Errors
    ///
    /// `MarketNotResolved`, `PositionNotFound` (including a second redemption
    /// of the same position), `NotPositionOwner`, `InsufficientLiquidity`, or
    /// whatever `pay_out` returns.
    pub fn redeem<F>(
        &mut self,
        owner: &AccountId,
        position_id: PositionId,
        pay_out: F,
    ) -> Result<Redemption, EngineError>
    where
        F: FnOnce(u64) -> Result<(), EngineError>,
    {
        let winner = self
            .resolution
            .winner()
            .ok_or_else(|| EngineError::MarketNotResolved {
                market_id: self.id.clone(),
            })?;

        let position = self.owned_position(owner, position_id)?.clone();
        let outcome = position.outcome();
        let shares = position.shares();
        let payout = if outcome == winner { shares } else { 0 };

        let collateral_balance = self
            .collateral_balance
            .checked_sub(payout)
            .ok_or_else(|| EngineError::liquidity("pool cannot cover redemption"))?;
        let outstanding = self
            .outstanding
            .with(outcome, checked_sub(self.outstanding.of(outcome), shares)?);

        pay_out(payout)?;

        self.collateral_balance = collateral_balance;
        self.outstanding = outstanding;
        self.positions.remove(position_id);

        Ok(Redemption { position, payout })
    }

    fn ensure_open(&self, now: DateTime<Utc>) -> Result<(), EngineError> {
        if self.phase(now) == MarketPhase::Open {
            Ok(())
        } else {
            Err(EngineError::MarketClosed {
                market_id: self.id.clone(),
            })
        }
    }

    fn owned_position(
        &self,
        caller: &AccountId,
        position_id: PositionId,
    ) -> Result<&Position, EngineError> {
        let position = self
            .positions
            .get(position_id)
            .ok_or(EngineError::PositionNotFound {
                market_id: self.id.clone(),
                position_id,
            })?;
        if !position.is_owned_by(caller) {
            return Err(EngineError::NotPositionOwner { position_id });
        }
        Ok(position)
    }
}

/// Pooled collateral must cover every outstanding share of either side.
fn ensure_solvent(collateral: u64, outstanding: Outstanding) -> Result<(), EngineError> {
    if collateral < outstanding.max() {
        return Err(EngineError::liquidity(format!(
            "collateral {collateral} would not cover {} outstanding shares",
            outstanding.max()
        )));
    }
    Ok(())
}
