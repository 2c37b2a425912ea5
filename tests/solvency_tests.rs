//! Randomized trade sequences against the pool's accounting invariants.

mod support;

use outcome_amm::domain::{AccountId, MarketId, Outcome, UNIT};
use outcome_amm::error::EngineError;
use outcome_amm::testkit::domain::{btc_terms, TestEngine};
use support::assertions::{assert_outstanding_matches_positions, assert_prices_coherent, assert_solvent};

/// Small deterministic xorshift generator so failures reproduce.
struct Xorshift(u64);

impl Xorshift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn random_trade(
    engine: &TestEngine,
    market: &MarketId,
    traders: &[AccountId],
    rng: &mut Xorshift,
) -> Result<(), EngineError> {
    let trader = &traders[rng.below(traders.len() as u64) as usize];
    let outcome = if rng.below(2) == 0 { Outcome::Yes } else { Outcome::No };
    let held = engine.registry.get_position(trader, market, outcome)?;

    match held {
        Some(position) if rng.below(3) == 0 => {
            let shares = 1 + rng.below(position.shares());
            engine
                .registry
                .sell(trader, &position.reference(), shares)
                .map(|_| ())
        }
        _ => {
            let shares = 1 + rng.below(20 * UNIT);
            engine
                .registry
                .buy(trader, market, outcome, shares, u64::MAX)
                .map(|_| ())
        }
    }
}

#[test]
fn pool_stays_solvent_under_random_trading() {
    for seed in [1_u64, 7, 42, 1_234_567, 0xDEAD_BEEF] {
        let engine = TestEngine::builder().fee_bps(30).build();
        let market = engine.market(btc_terms());
        let traders: Vec<AccountId> = (0..5)
            .map(|i| engine.trader(&format!("t{i}"), 10_000))
            .collect();
        let mut rng = Xorshift(seed);
        let mut product = engine
            .registry
            .market_snapshot(&market)
            .unwrap()
            .reserves
            .product();

        for step in 0..300 {
            match random_trade(&engine, &market, &traders, &mut rng) {
                Ok(()) => {}
                // Large buys against a depleted side, or beyond a trader's funds.
                Err(EngineError::InsufficientLiquidity { .. } | EngineError::PaymentFailed { .. }) => {}
                Err(other) => panic!("seed {seed} step {step}: {other}"),
            }

            let snapshot = engine.registry.market_snapshot(&market).unwrap();
            assert!(
                snapshot.reserves.product() >= product,
                "seed {seed} step {step}: curve product shrank"
            );
            product = snapshot.reserves.product();
            assert_solvent(&engine.registry, &market);
            assert_prices_coherent(&engine.registry, &market);
        }
        assert_outstanding_matches_positions(&engine.registry, &market);
    }
}

#[test]
fn redemptions_never_exceed_pool() {
    for (seed, winner) in [(3_u64, Outcome::Yes), (11, Outcome::No), (99, Outcome::Yes)] {
        let engine = TestEngine::builder().build();
        let market = engine.market(btc_terms());
        let traders: Vec<AccountId> = (0..4)
            .map(|i| engine.trader(&format!("r{i}"), 10_000))
            .collect();
        let mut rng = Xorshift(seed);
        for _ in 0..100 {
            let _ = random_trade(&engine, &market, &traders, &mut rng);
        }

        engine.pass_deadline();
        engine
            .settlement
            .override_outcome(&engine.admin(), &market, winner)
            .unwrap_err();
        engine.clock.advance(chrono::Duration::hours(1));
        engine
            .settlement
            .override_outcome(&engine.admin(), &market, winner)
            .unwrap();

        let pool = engine.registry.get_market_balance(&market).unwrap();
        let positions: Vec<_> = traders
            .iter()
            .flat_map(|t| engine.registry.positions_of(t))
            .collect();
        let mut paid = 0;
        for position in positions {
            let redemption = engine
                .registry
                .redeem(position.owner(), &position.reference())
                .unwrap();
            paid += redemption.payout;
        }

        assert!(paid <= pool, "seed {seed}: paid {paid} from pool {pool}");
        assert_eq!(engine.registry.get_market_balance(&market).unwrap(), pool - paid);
        let snapshot = engine.registry.market_snapshot(&market).unwrap();
        assert_eq!(snapshot.outstanding.max(), 0);
        assert_eq!(snapshot.open_positions, 0);
    }
}
