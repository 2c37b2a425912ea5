//! Oracle-driven settlement.
//!
//! The engine reads the market's price feed once the deadline has passed,
//! compares the reading with the market's target and resolves the market.
//! Oracle reads are the only I/O in the settlement path; they are bounded by
//! a per-attempt timeout and a [`RetryPolicy`]. When every attempt fails the
//! market stays `AwaitingResolution` and can be retried later or, after the
//! grace period, overridden by governance.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use super::registry::MarketRegistry;
use super::retry::RetryPolicy;
use crate::domain::{
    AccountId, Comparison, MarketId, MarketPhase, Outcome, PriceReading, ResolutionAuthority,
    ResolutionSource,
};
use crate::error::EngineError;
use crate::port::PriceOracle;

/// Timing rules for settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPolicy {
    pub retry: RetryPolicy,
    /// Time after the deadline before governance may override.
    pub grace_period: Duration,
    /// Oldest acceptable oracle reading.
    pub max_staleness: Duration,
    /// Bound on a single oracle call.
    pub attempt_timeout: StdDuration,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            grace_period: Duration::hours(1),
            max_staleness: Duration::minutes(5),
            attempt_timeout: StdDuration::from_secs(5),
        }
    }
}

/// Result of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub market_id: MarketId,
    pub outcome: Outcome,
    pub source: ResolutionSource,
    pub resolved_at: DateTime<Utc>,
}

/// What settlement needs to know about a market, read under its lock.
struct Terms {
    phase: MarketPhase,
    deadline: DateTime<Utc>,
    feed: String,
    target_price: u64,
    comparison: Comparison,
}

/// Resolves markets from an oracle, with a governance fallback.
pub struct SettlementEngine {
    registry: Arc<MarketRegistry>,
    oracle: Arc<dyn PriceOracle>,
    policy: SettlementPolicy,
}

impl SettlementEngine {
    pub fn new(
        registry: Arc<MarketRegistry>,
        oracle: Arc<dyn PriceOracle>,
        policy: SettlementPolicy,
    ) -> Self {
        Self {
            registry,
            oracle,
            policy,
        }
    }

    pub const fn policy(&self) -> &SettlementPolicy {
        &self.policy
    }

    /// Settle a market from its oracle feed.
    ///
    /// # Errors
    ///
    /// - `MarketNotFound` for an unknown id.
    /// - `TooEarly` before the deadline.
    /// - `AlreadyResolved` if the market has an outcome.
    /// - `OracleUnavailable` when no fresh reading arrives within the retry
    ///   policy; the market is left `AwaitingResolution`.
    pub async fn settle(&self, market_id: &MarketId) -> Result<Settlement, EngineError> {
        let terms = self.terms(market_id)?;
        match terms.phase {
            MarketPhase::Open => {
                return Err(EngineError::TooEarly {
                    market_id: market_id.clone(),
                })
            }
            MarketPhase::Resolved => {
                return Err(EngineError::AlreadyResolved {
                    market_id: market_id.clone(),
                })
            }
            MarketPhase::AwaitingResolution => {}
        }

        let reading = self.fetch_reading(market_id, &terms.feed).await?;
        let outcome = terms.comparison.decide(reading.value, terms.target_price);
        let source = ResolutionSource::Oracle {
            value: reading.value,
        };
        info!(
            market_id = %market_id,
            value = reading.value,
            target = terms.target_price,
            comparison = %terms.comparison,
            outcome = %outcome,
            "Oracle reading decided market"
        );

        let resolved_at =
            self.registry
                .resolve(market_id, outcome, source, &ResolutionAuthority::new())?;
        Ok(Settlement {
            market_id: market_id.clone(),
            outcome,
            source,
            resolved_at,
        })
    }

    /// Settle every market that is past its deadline.
    ///
    /// Failures are returned per market and do not stop the sweep.
    pub async fn settle_due(&self) -> Vec<(MarketId, Result<Settlement, EngineError>)> {
        let mut results = Vec::new();
        for market_id in self.registry.awaiting_resolution() {
            let result = self.settle(&market_id).await;
            if let Err(error) = &result {
                warn!(market_id = %market_id, error = %error, "Settlement failed");
            }
            results.push((market_id, result));
        }
        results
    }

    /// Governance override for a market whose oracle never delivered.
    ///
    /// Allowed once the grace period after the deadline has elapsed and the
    /// market is still unresolved.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the admin, `MarketNotFound`,
    /// `AlreadyResolved`, or `TooEarly` while the market is open or the
    /// grace period is still running.
    pub fn override_outcome(
        &self,
        caller: &AccountId,
        market_id: &MarketId,
        outcome: Outcome,
    ) -> Result<Settlement, EngineError> {
        self.registry
            .authorize(caller, "override a market outcome")?;
        let terms = self.terms(market_id)?;
        match terms.phase {
            MarketPhase::Resolved => {
                return Err(EngineError::AlreadyResolved {
                    market_id: market_id.clone(),
                })
            }
            MarketPhase::Open => {
                return Err(EngineError::TooEarly {
                    market_id: market_id.clone(),
                })
            }
            MarketPhase::AwaitingResolution => {}
        }
        let grace_over = terms
            .deadline
            .checked_add_signed(self.policy.grace_period)
            .is_some_and(|opens| self.registry.clock().now() >= opens);
        if !grace_over {
            return Err(EngineError::TooEarly {
                market_id: market_id.clone(),
            });
        }

        warn!(market_id = %market_id, caller = %caller, outcome = %outcome, "Outcome overridden");
        let resolved_at = self.registry.resolve(
            market_id,
            outcome,
            ResolutionSource::Override,
            &ResolutionAuthority::new(),
        )?;
        Ok(Settlement {
            market_id: market_id.clone(),
            outcome,
            source: ResolutionSource::Override,
            resolved_at,
        })
    }

    fn terms(&self, market_id: &MarketId) -> Result<Terms, EngineError> {
        let now = self.registry.clock().now();
        self.registry.inspect(market_id, |market| Terms {
            phase: market.phase(now),
            deadline: market.deadline(),
            feed: market.price_identifier().to_string(),
            target_price: market.target_price(),
            comparison: market.comparison(),
        })
    }

    async fn fetch_reading(
        &self,
        market_id: &MarketId,
        feed: &str,
    ) -> Result<PriceReading, EngineError> {
        let retry = &self.policy.retry;
        let mut last_failure = String::from("no attempts configured");

        for attempt in 1..=retry.max_attempts {
            let failure = match timeout(self.policy.attempt_timeout, self.oracle.get_price(feed)).await
            {
                Ok(Ok(reading)) => {
                    let received_at = self.registry.clock().now();
                    if reading.is_fresh(received_at, self.policy.max_staleness) {
                        return Ok(reading);
                    }
                    format!(
                        "stale reading from {} (received {})",
                        reading.timestamp, received_at
                    )
                }
                Ok(Err(error)) => error.to_string(),
                Err(_) => format!(
                    "no answer within {}ms",
                    self.policy.attempt_timeout.as_millis()
                ),
            };

            warn!(
                market_id = %market_id,
                feed,
                attempt,
                max_attempts = retry.max_attempts,
                reason = %failure,
                "Oracle attempt failed"
            );
            last_failure = failure;

            if attempt < retry.max_attempts {
                sleep(retry.delay_for(attempt)).await;
            }
        }

        Err(EngineError::OracleUnavailable {
            market_id: market_id.clone(),
            reason: last_failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{FixedPriceOracle, InMemoryLedger, ManualClock};
    use crate::domain::{Category, GlobalConfig, MarketDefaults, NewMarket};
    use crate::port::Clock;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn fast_policy() -> SettlementPolicy {
        SettlementPolicy {
            retry: RetryPolicy::fixed(2, StdDuration::from_millis(1)),
            attempt_timeout: StdDuration::from_millis(200),
            ..SettlementPolicy::default()
        }
    }

    fn setup() -> (
        Arc<MarketRegistry>,
        Arc<ManualClock>,
        Arc<FixedPriceOracle>,
        SettlementEngine,
        MarketId,
    ) {
        let clock = Arc::new(ManualClock::new(start()));
        let config = GlobalConfig::new(10, 100, AccountId::from("gov")).unwrap();
        let registry = Arc::new(MarketRegistry::new(
            config,
            MarketDefaults::default(),
            Arc::new(InMemoryLedger::new()),
            clock.clone(),
        ));
        let terms = NewMarket::new(
            "BTC above 100k",
            Category::Crypto,
            start() + Duration::days(1),
            100_000,
            Comparison::Above,
        )
        .with_price_identifier("BTC/USD");
        let id = registry
            .create_market(&AccountId::from("creator"), terms)
            .unwrap();
        let oracle = Arc::new(FixedPriceOracle::new());
        let engine = SettlementEngine::new(registry.clone(), oracle.clone(), fast_policy());
        (registry, clock, oracle, engine, id)
    }

    #[tokio::test]
    async fn settles_yes_above_target() {
        let (registry, clock, oracle, engine, id) = setup();
        clock.advance(Duration::days(1));
        oracle.publish("BTC/USD", PriceReading::new(100_001, clock.now()));

        let settlement = engine.settle(&id).await.unwrap();

        assert_eq!(settlement.outcome, Outcome::Yes);
        assert_eq!(settlement.source, ResolutionSource::Oracle { value: 100_001 });
        assert!(registry.is_market_resolved(&id).unwrap());
    }

    #[tokio::test]
    async fn equal_to_target_settles_no() {
        let (_, clock, oracle, engine, id) = setup();
        clock.advance(Duration::days(1));
        oracle.publish("BTC/USD", PriceReading::new(100_000, clock.now()));

        assert_eq!(engine.settle(&id).await.unwrap().outcome, Outcome::No);
    }

    #[tokio::test]
    async fn before_deadline_is_too_early() {
        let (_, clock, oracle, engine, id) = setup();
        oracle.publish("BTC/USD", PriceReading::new(1, clock.now()));

        assert!(matches!(
            engine.settle(&id).await,
            Err(EngineError::TooEarly { .. })
        ));
    }

    #[tokio::test]
    async fn stale_reading_leaves_market_awaiting() {
        let (registry, clock, oracle, engine, id) = setup();
        oracle.publish("BTC/USD", PriceReading::new(200_000, clock.now()));
        clock.advance(Duration::days(1));

        let err = engine.settle(&id).await.unwrap_err();

        match err {
            EngineError::OracleUnavailable { reason, .. } => assert!(reason.contains("stale")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!registry.is_market_resolved(&id).unwrap());
    }

    #[tokio::test]
    async fn override_waits_for_grace_period() {
        let (registry, clock, _, engine, id) = setup();
        let gov = AccountId::from("gov");
        clock.advance(Duration::days(1));

        assert!(matches!(
            engine.override_outcome(&gov, &id, Outcome::No),
            Err(EngineError::TooEarly { .. })
        ));
        assert!(matches!(
            engine.override_outcome(&AccountId::from("mallory"), &id, Outcome::No),
            Err(EngineError::Unauthorized { .. })
        ));

        clock.advance(Duration::hours(1));
        let settlement = engine.override_outcome(&gov, &id, Outcome::No).unwrap();
        assert_eq!(settlement.source, ResolutionSource::Override);
        assert!(registry.is_market_resolved(&id).unwrap());
    }
}
