//! Builders for markets and a fully wired in-memory engine.
//!
//! Provides concise factory functions so tests focus on assertions rather
//! than construction boilerplate.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::config;
use super::notifier::RecordingNotifier;
use super::oracle::ScriptedOracle;
use crate::adapter::{InMemoryLedger, ManualClock};
use crate::application::{MarketRegistry, SettlementEngine, SettlementPolicy};
use crate::domain::{
    AccountId, Category, Comparison, GlobalConfig, MarketDefaults, MarketId, NewMarket, UNIT,
};

/// Fixed start time for every fixture clock.
pub fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

pub fn account(name: &str) -> AccountId {
    AccountId::from(name)
}

/// Terms for a "BTC above 100k" market closing one day after [`epoch`].
pub fn btc_terms() -> NewMarket {
    NewMarket::new(
        "BTC above 100k",
        Category::Crypto,
        epoch() + Duration::days(1),
        100_000,
        Comparison::Above,
    )
    .with_price_identifier("BTC/USD")
}

/// Every collaborator of a registry, with handles kept for assertions.
pub struct TestEngine {
    pub registry: Arc<MarketRegistry>,
    pub ledger: Arc<InMemoryLedger>,
    pub clock: Arc<ManualClock>,
    pub oracle: Arc<ScriptedOracle>,
    pub events: RecordingNotifier,
    pub settlement: SettlementEngine,
}

/// Builder for [`TestEngine`].
pub struct TestEngineBuilder {
    global: GlobalConfig,
    defaults: MarketDefaults,
    policy: SettlementPolicy,
    oracle: ScriptedOracle,
}

impl Default for TestEngineBuilder {
    fn default() -> Self {
        Self {
            global: config::global(10),
            defaults: config::market_defaults(100),
            policy: config::settlement(3),
            oracle: ScriptedOracle::down(),
        }
    }
}

impl TestEngineBuilder {
    #[must_use]
    pub fn fee_bps(mut self, fee_bps: u64) -> Self {
        self.global = config::global(fee_bps);
        self
    }

    /// Virtual liquidity per side, in whole units.
    #[must_use]
    pub fn liquidity(mut self, units: u64) -> Self {
        self.defaults = config::market_defaults(units);
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: SettlementPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn oracle(mut self, oracle: ScriptedOracle) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn build(self) -> TestEngine {
        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(ManualClock::new(epoch()));
        let oracle = Arc::new(self.oracle);
        let events = RecordingNotifier::new();
        let registry = Arc::new(
            MarketRegistry::new(self.global, self.defaults, ledger.clone(), clock.clone())
                .with_notifier(Arc::new(events.clone())),
        );
        let settlement = SettlementEngine::new(registry.clone(), oracle.clone(), self.policy);
        TestEngine {
            registry,
            ledger,
            clock,
            oracle,
            events,
            settlement,
        }
    }
}

impl TestEngine {
    pub fn builder() -> TestEngineBuilder {
        TestEngineBuilder::default()
    }

    pub fn admin(&self) -> AccountId {
        account(config::ADMIN)
    }

    /// A trader funded with `units` whole units of collateral.
    pub fn trader(&self, name: &str, units: u64) -> AccountId {
        let trader = account(name);
        if let Err(e) = self.ledger.deposit(&trader, units * UNIT) {
            panic!("funding {name} failed: {e}");
        }
        trader
    }

    /// Create a market from `terms` on behalf of `creator`.
    pub fn market(&self, terms: NewMarket) -> MarketId {
        match self.registry.create_market(&account("creator"), terms) {
            Ok(id) => id,
            Err(e) => panic!("market creation failed: {e}"),
        }
    }

    /// Move the clock just past the market deadline of [`btc_terms`].
    pub fn pass_deadline(&self) {
        self.clock.set(epoch() + Duration::days(1));
    }
}
