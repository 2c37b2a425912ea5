//! Presentation-only price formatting.
//!
//! Front ends show prices in cents with a small spread so the two sides sum
//! to slightly more than 100. That spread is cosmetic: it is computed here
//! from curve prices and never flows back into reserves, quotes or fees.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use super::curve::{Prices, PRICE_SCALE};

/// Display prices in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayQuote {
    pub yes_cents: Decimal,
    pub no_cents: Decimal,
}

/// How display prices are widened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySpread {
    /// Relative markup applied to the YES price.
    pub markup: Decimal,
    /// Cents the two sides sum to above 100.
    pub overround_cents: Decimal,
}

impl Default for DisplaySpread {
    fn default() -> Self {
        Self {
            markup: dec!(0.005),
            overround_cents: dec!(1),
        }
    }
}

impl DisplayQuote {
    /// Raw probabilities in cents, no spread.
    #[must_use]
    pub fn mid(prices: &Prices) -> Self {
        Self {
            yes_cents: to_cents(prices.yes),
            no_cents: to_cents(prices.no),
        }
    }

    /// Widened prices: YES is marked up and rounded to a whole cent, NO is
    /// whatever brings the pair to `100 + overround_cents`.
    #[must_use]
    pub fn with_spread(prices: &Prices, spread: &DisplaySpread) -> Self {
        let yes_cents = (to_cents(prices.yes) * (Decimal::ONE + spread.markup))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .min(dec!(100));
        let no_cents = (dec!(100) + spread.overround_cents - yes_cents).max(Decimal::ZERO);
        Self {
            yes_cents,
            no_cents,
        }
    }
}

fn to_cents(price: u64) -> Decimal {
    Decimal::from(price) * dec!(100) / Decimal::from(PRICE_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_prices_are_plain_percentages() {
        let quote = DisplayQuote::mid(&Prices {
            yes: 625_000,
            no: 375_000,
        });
        assert_eq!(quote.yes_cents, dec!(62.5));
        assert_eq!(quote.no_cents, dec!(37.5));
    }

    #[test]
    fn spread_adds_one_cent_of_overround() {
        let prices = Prices {
            yes: 500_000,
            no: 500_000,
        };
        let quote = DisplayQuote::with_spread(&prices, &DisplaySpread::default());
        assert_eq!(quote.yes_cents, dec!(50));
        assert_eq!(quote.no_cents, dec!(51));
        assert_eq!(quote.yes_cents + quote.no_cents, dec!(101));
    }

    #[test]
    fn spread_does_not_touch_input_prices() {
        let prices = Prices {
            yes: 800_000,
            no: 200_000,
        };
        let quote = DisplayQuote::with_spread(&prices, &DisplaySpread::default());
        assert_eq!(quote.yes_cents, dec!(80));
        assert_eq!(prices.yes + prices.no, PRICE_SCALE);
    }
}
