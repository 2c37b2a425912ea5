//! Invariant checks shared by the integration tests.

use outcome_amm::application::MarketRegistry;
use outcome_amm::domain::{MarketId, Outcome, PRICE_SCALE};

/// The pool can pay out the winning side whichever outcome wins.
pub fn assert_solvent(registry: &MarketRegistry, market_id: &MarketId) {
    let snapshot = registry.market_snapshot(market_id).unwrap();
    assert!(
        snapshot.collateral_balance >= snapshot.outstanding.max(),
        "pool {} cannot cover outstanding {:?}",
        snapshot.collateral_balance,
        snapshot.outstanding
    );
}

/// Both prices are valid probabilities summing to one, within rounding.
pub fn assert_prices_coherent(registry: &MarketRegistry, market_id: &MarketId) {
    let prices = registry.get_prices(market_id).unwrap();
    let sum = prices.yes + prices.no;
    assert!(
        sum == PRICE_SCALE || sum == PRICE_SCALE - 1,
        "prices {prices:?} sum to {sum}"
    );
    assert!(prices.of(Outcome::Yes) > 0 && prices.of(Outcome::No) > 0);
}

/// Outstanding shares equal the sum over live positions, per side.
pub fn assert_outstanding_matches_positions(registry: &MarketRegistry, market_id: &MarketId) {
    let (yes, no) = registry
        .inspect(market_id, |market| {
            market
                .positions()
                .iter()
                .fold((0u64, 0u64), |(yes, no), p| match p.outcome() {
                    Outcome::Yes => (yes + p.shares(), no),
                    Outcome::No => (yes, no + p.shares()),
                })
        })
        .unwrap();
    let outstanding = registry.market_snapshot(market_id).unwrap().outstanding;
    assert_eq!((outstanding.yes, outstanding.no), (yes, no));
}
