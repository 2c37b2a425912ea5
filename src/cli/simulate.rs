//! Scripted, fully in-memory market lifecycle.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use super::args::SimulateArgs;
use super::output;
use crate::adapter::{FixedPriceOracle, InMemoryLedger, ManualClock};
use crate::application::MarketRegistry;
use crate::domain::{
    AccountId, Category, Comparison, NewMarket, Outcome, PositionRef, PriceReading, UNIT,
};
use crate::error::{EngineError, Result};
use crate::infrastructure::bootstrap::{build_engine, build_notifier_registry};
use crate::infrastructure::config::Config;
use crate::port::{Clock, Ledger};

const FEED: &str = "BTC/USD";
const TARGET: u64 = 100_000;

/// Create a market, trade both sides, settle from the oracle and redeem.
pub async fn execute(args: &SimulateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let ledger = Arc::new(InMemoryLedger::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let oracle = Arc::new(FixedPriceOracle::new());
    let notifier = Arc::new(build_notifier_registry(Vec::new()));
    let engine = build_engine(&config, ledger.clone(), clock.clone(), oracle.clone(), notifier)?;
    let registry = &engine.registry;

    let alice = AccountId::from("alice");
    let bob = AccountId::from("bob");
    for trader in [&alice, &bob] {
        ledger
            .deposit(trader, 1_000 * UNIT)
            .map_err(EngineError::from)?;
    }

    let terms = NewMarket::new(
        "BTC above 100k",
        Category::Crypto,
        clock.now() + Duration::days(1),
        TARGET,
        Comparison::Above,
    )
    .with_description("Resolves YES if BTC/USD trades above 100,000 at the deadline.")
    .with_price_identifier(FEED);
    let market_id = registry.create_market(&AccountId::from("creator"), terms)?;

    output::section(&format!("Market {market_id}"));
    output::prices("Opening", &registry.get_prices(&market_id)?);

    let bought = registry.buy(&alice, &market_id, Outcome::Yes, 50 * UNIT, 200 * UNIT)?;
    output::key_value(
        "alice buys",
        format!("50 YES for {}", output::amount(bought.amount)),
    );
    output::prices("", &bought.prices_after);

    let hedged = registry.buy(&bob, &market_id, Outcome::No, 30 * UNIT, 200 * UNIT)?;
    output::key_value(
        "bob buys",
        format!("30 NO for {}", output::amount(hedged.amount)),
    );
    output::prices("", &hedged.prices_after);

    let sold = registry.sell(&alice, &bought.position, 10 * UNIT)?;
    output::key_value(
        "alice sells",
        format!("10 YES for {}", output::amount(sold.amount)),
    );
    output::prices("", &sold.prices_after);

    clock.advance(Duration::days(1));
    let reading = PriceReading::new(args.settle_price, clock.now());
    oracle.publish(FEED, reading);
    let settlement = engine.settlement.settle(&market_id).await?;
    info!(market_id = %market_id, outcome = %settlement.outcome, "Simulation settled");

    output::section("Settlement");
    output::key_value("Oracle price", args.settle_price);
    output::key_value("Outcome", settlement.outcome);

    for (trader, position) in [(&alice, bought.position.clone()), (&bob, hedged.position.clone())] {
        redeem(registry, trader, &position)?;
    }

    output::section("Balances");
    output::key_value("alice", output::amount(ledger.balance(&alice)));
    output::key_value("bob", output::amount(ledger.balance(&bob)));

    let snapshot = registry.market_snapshot(&market_id)?;
    output::key_value("Pool remaining", output::amount(snapshot.collateral_balance));
    output::key_value("Fees collected", output::amount(snapshot.fees_collected));

    if args.json {
        output::json(&snapshot)?;
    }
    Ok(())
}

fn redeem(
    registry: &MarketRegistry,
    trader: &AccountId,
    position: &PositionRef,
) -> Result<()> {
    let redemption = registry.redeem(trader, position)?;
    let verdict = if redemption.won() { "won" } else { "lost" };
    output::key_value(
        trader.as_str(),
        format!(
            "{} {} shares {verdict}, paid {}",
            output::amount(redemption.position.shares()),
            redemption.position.outcome(),
            output::amount(redemption.payout)
        ),
    );
    Ok(())
}
