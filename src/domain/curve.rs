//! Constant-product bonding curve for binary markets.
//!
//! The curve keeps two virtual reserves, `yes` and `no`, and preserves
//! `yes * no` across every trade. Buying `s` YES shares removes `s` from the
//! YES reserve and adds the collateral paid to the NO reserve:
//!
//! ```text
//! (yes - s) * (no + cost) = yes * no      =>  cost = ceil(no * s / (yes - s))
//! ```
//!
//! Selling `s` YES shares is the mirror image:
//!
//! ```text
//! (yes + s) * (no - proceeds) = yes * no  =>  proceeds = floor(no * s / (yes + s))
//! ```
//!
//! The implied probability of YES is `no / (yes + no)`, so prices of the two
//! sides always sum to one. Cost is convex in size and diverges as `s`
//! approaches the reserve, which can therefore never be drained to zero.
//! Rounding is up on cost and down on proceeds, so `yes * no` only ever grows.

use serde::{Deserialize, Serialize};

use super::market::Outcome;
use super::math::{checked_add, checked_sub, mul_div, mul_div_ceil, percentage_of};
use super::money::UNIT;
use crate::error::EngineError;

/// Fixed-point scale for prices: `PRICE_SCALE` is probability 1.0.
pub const PRICE_SCALE: u64 = UNIT;

/// Virtual share reserves backing the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    yes: u64,
    no: u64,
}

impl Reserves {
    /// Create reserves, requiring both sides to be at least one.
    ///
    /// # Errors
    ///
    /// `InvalidMarket` if either side is zero.
    pub fn new(yes: u64, no: u64) -> Result<Self, EngineError> {
        if yes == 0 || no == 0 {
            return Err(EngineError::invalid_market(format!(
                "reserves must be positive, got yes={yes} no={no}"
            )));
        }
        Ok(Self { yes, no })
    }

    /// Equal reserves on both sides (a 50/50 market).
    ///
    /// # Errors
    ///
    /// `InvalidMarket` if `liquidity` is zero.
    pub fn balanced(liquidity: u64) -> Result<Self, EngineError> {
        Self::new(liquidity, liquidity)
    }

    #[must_use]
    pub const fn yes(&self) -> u64 {
        self.yes
    }

    #[must_use]
    pub const fn no(&self) -> u64 {
        self.no
    }

    /// Reserve on the given side.
    #[must_use]
    pub const fn side(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.yes,
            Outcome::No => self.no,
        }
    }

    /// Reserve on the side opposite `outcome`.
    #[must_use]
    pub const fn opposite(&self, outcome: Outcome) -> u64 {
        self.side(outcome.opposite())
    }

    /// `yes * no`, the quantity every trade preserves or grows.
    #[must_use]
    pub fn product(&self) -> u128 {
        u128::from(self.yes) * u128::from(self.no)
    }

    fn from_sides(outcome: Outcome, side: u64, opposite: u64) -> Self {
        match outcome {
            Outcome::Yes => Self {
                yes: side,
                no: opposite,
            },
            Outcome::No => Self {
                yes: opposite,
                no: side,
            },
        }
    }
}

/// Implied probabilities of both outcomes, in `PRICE_SCALE` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prices {
    pub yes: u64,
    pub no: u64,
}

impl Prices {
    #[must_use]
    pub const fn of(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.yes,
            Outcome::No => self.no,
        }
    }
}

/// Result of pricing a buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuyQuote {
    pub outcome: Outcome,
    pub shares: u64,
    /// Collateral the curve charges before fees.
    pub cost: u64,
    pub fee: u64,
    /// `cost + fee`, the amount the trader pays.
    pub total: u64,
    pub reserves_after: Reserves,
}

/// Result of pricing a sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SellQuote {
    pub outcome: Outcome,
    pub shares: u64,
    /// Collateral the curve releases before fees.
    pub proceeds: u64,
    pub fee: u64,
    /// `proceeds - fee`, the amount the trader receives.
    pub net: u64,
    pub reserves_after: Reserves,
}

/// Pricing functions over [`Reserves`]. Stateless; callers own the reserves.
pub struct BondingCurve;

impl BondingCurve {
    /// Implied probability of `outcome`.
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` if the reserves sum past `u64::MAX`.
    pub fn price(reserves: &Reserves, outcome: Outcome) -> Result<u64, EngineError> {
        let total = checked_add(reserves.yes, reserves.no)?;
        mul_div(reserves.opposite(outcome), PRICE_SCALE, total)
    }

    /// Implied probabilities of both outcomes. Each side is floored, so the
    /// sum is `PRICE_SCALE` or one unit below it.
    ///
    /// # Errors
    ///
    /// Same as [`BondingCurve::price`].
    pub fn prices(reserves: &Reserves) -> Result<Prices, EngineError> {
        Ok(Prices {
            yes: Self::price(reserves, Outcome::Yes)?,
            no: Self::price(reserves, Outcome::No)?,
        })
    }

    /// Price buying `shares` of `outcome` with a `fee_bps` fee added on top.
    ///
    /// Zero shares cost nothing and leave the reserves unchanged.
    ///
    /// # Errors
    ///
    /// `InsufficientLiquidity` if `shares` would drain the reserve,
    /// `ArithmeticOverflow` if the cost does not fit in `u64`.
    pub fn quote_buy(
        reserves: &Reserves,
        outcome: Outcome,
        shares: u64,
        fee_bps: u64,
    ) -> Result<BuyQuote, EngineError> {
        let side = reserves.side(outcome);
        let opposite = reserves.opposite(outcome);

        if shares >= side {
            return Err(EngineError::liquidity(format!(
                "buying {shares} {outcome} shares would drain a reserve of {side}"
            )));
        }

        let remaining = side - shares;
        let cost = mul_div_ceil(opposite, shares, remaining)?;
        let fee = percentage_of(cost, fee_bps)?;
        let total = checked_add(cost, fee)?;

        Ok(BuyQuote {
            outcome,
            shares,
            cost,
            fee,
            total,
            reserves_after: Reserves::from_sides(outcome, remaining, checked_add(opposite, cost)?),
        })
    }

    /// Price selling `shares` of `outcome` with a `fee_bps` fee withheld.
    ///
    /// # Errors
    ///
    /// `InsufficientLiquidity` if the payout would take the opposing reserve
    /// to zero, `ArithmeticOverflow` on overflow.
    pub fn quote_sell(
        reserves: &Reserves,
        outcome: Outcome,
        shares: u64,
        fee_bps: u64,
    ) -> Result<SellQuote, EngineError> {
        let side = reserves.side(outcome);
        let opposite = reserves.opposite(outcome);

        let grown = checked_add(side, shares)?;
        let proceeds = mul_div(opposite, shares, grown)?;
        if proceeds >= opposite {
            return Err(EngineError::liquidity(format!(
                "selling {shares} {outcome} shares would drain a reserve of {opposite}"
            )));
        }

        let fee = percentage_of(proceeds, fee_bps)?;
        let net = checked_sub(proceeds, fee)?;

        Ok(SellQuote {
            outcome,
            shares,
            proceeds,
            fee,
            net,
            reserves_after: Reserves::from_sides(outcome, grown, opposite - proceeds),
        })
    }
}
