//! Composition root: wires configuration and adapters into the engine.

use std::sync::Arc;

use tracing::info;

use crate::adapter::LogNotifier;
use crate::application::{MarketRegistry, SettlementEngine};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{Clock, Ledger, Notifier, NotifierRegistry, PriceOracle};

/// A registry and the settlement engine that resolves its markets.
pub struct Engine {
    pub registry: Arc<MarketRegistry>,
    pub settlement: SettlementEngine,
}

/// Build the notifier fan-out: structured logs, plus any extra sinks.
pub fn build_notifier_registry(extra: Vec<Box<dyn Notifier>>) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    for notifier in extra {
        registry.register(notifier);
    }
    registry
}

/// Assemble an engine from a validated configuration and its collaborators.
///
/// # Errors
///
/// Returns an error if the fee settings are inconsistent.
pub fn build_engine(
    config: &Config,
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
    oracle: Arc<dyn PriceOracle>,
    notifier: Arc<dyn Notifier>,
) -> Result<Engine> {
    let global = config.global_config()?;
    info!(
        fee_bps = global.fee_bps(),
        max_fee_bps = global.max_fee_bps(),
        admin = %global.admin(),
        virtual_liquidity = config.markets.virtual_liquidity,
        "Engine configured"
    );

    let registry = Arc::new(
        MarketRegistry::new(global, config.market_defaults(), ledger, clock)
            .with_notifier(notifier),
    );
    let settlement =
        SettlementEngine::new(Arc::clone(&registry), oracle, config.settlement_policy());

    Ok(Engine {
        registry,
        settlement,
    })
}
