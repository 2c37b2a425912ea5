//! Market registry: creation, indexing and the trading entry points.
//!
//! Each market lives in its own `parking_lot::Mutex`, so operations on one
//! market are serialized while operations on different markets run in
//! parallel. The registry's own maps are concurrent (`DashMap`) and are never
//! held while a market lock is taken.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::{
    AccountId, BuyQuote, Category, Event, GlobalConfig, Market, MarketDefaults, MarketId,
    MarketPhase, MarketSnapshot, NewMarket, Outcome, Position, PositionRef, Prices, Redemption,
    ResolutionAuthority, ResolutionSource, SellQuote, TradeReceipt,
};
use crate::error::EngineError;
use crate::port::{Clock, Ledger, Notifier, NullNotifier};

type MarketCell = Arc<Mutex<Market>>;

/// Creates markets and routes every trade, redemption and view to them.
pub struct MarketRegistry {
    config: RwLock<GlobalConfig>,
    defaults: MarketDefaults,
    markets: DashMap<MarketId, MarketCell>,
    by_category: DashMap<Category, Vec<MarketId>>,
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl MarketRegistry {
    pub fn new(
        config: GlobalConfig,
        defaults: MarketDefaults,
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            defaults,
            markets: DashMap::new(),
            by_category: DashMap::new(),
            ledger,
            clock,
            notifier: Arc::new(NullNotifier),
        }
    }

    /// Publish lifecycle events to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Copy of the current global configuration.
    pub fn config(&self) -> GlobalConfig {
        self.config.read().clone()
    }

    pub fn fee_bps(&self) -> u64 {
        self.config.read().fee_bps()
    }

    pub fn is_trading_paused(&self) -> bool {
        self.config.read().trading_paused()
    }

    /// Create a market, snapshotting the current global fee onto it.
    ///
    /// # Errors
    ///
    /// `InvalidMarket` if the parameters fail validation.
    pub fn create_market(
        &self,
        creator: &AccountId,
        terms: NewMarket,
    ) -> Result<MarketId, EngineError> {
        let fee_bps = self.fee_bps();
        let now = self.clock.now();
        let id = MarketId::generate();
        let market = Market::new(id.clone(), creator.clone(), terms, &self.defaults, fee_bps, now)?;

        let event = Event::MarketCreated {
            market_id: id.clone(),
            name: market.name().to_string(),
            category: market.category(),
            creator: creator.clone(),
            deadline: market.deadline(),
            fee_bps,
        };
        let category = market.category();

        self.markets.insert(id.clone(), Arc::new(Mutex::new(market)));
        self.by_category.entry(category).or_default().push(id.clone());

        info!(market_id = %id, category = %category, fee_bps, "Market created");
        self.notifier.notify(event);
        Ok(id)
    }

    /// Buy `shares` of `outcome`, paying at most `max_payment` including fees.
    ///
    /// # Errors
    ///
    /// `TradingPaused`, `MarketNotFound`, everything [`Market::buy`] returns,
    /// and `PaymentFailed` if the ledger refuses the debit.
    pub fn buy(
        &self,
        trader: &AccountId,
        market_id: &MarketId,
        outcome: Outcome,
        shares: u64,
        max_payment: u64,
    ) -> Result<TradeReceipt, EngineError> {
        self.ensure_trading()?;
        let cell = self.market(market_id)?;
        let mut market = cell.lock();
        let now = self.clock.now();

        let receipt = market.buy(trader, outcome, shares, max_payment, now, |quote| {
            self.ledger.debit(trader, quote.total).map_err(EngineError::from)
        })?;

        self.trade_executed(market_id, &receipt, Event::SharesBought {
            market_id: market_id.clone(),
            receipt: receipt.clone(),
        });
        Ok(receipt)
    }

    /// Buy more shares into an existing position.
    ///
    /// # Errors
    ///
    /// As [`MarketRegistry::buy`], plus `PositionNotFound` and
    /// `NotPositionOwner`.
    pub fn add_to_position(
        &self,
        trader: &AccountId,
        position: &PositionRef,
        shares: u64,
        max_payment: u64,
    ) -> Result<TradeReceipt, EngineError> {
        self.ensure_trading()?;
        let cell = self.market(&position.market_id)?;
        let mut market = cell.lock();
        let now = self.clock.now();

        let receipt = market.add_to_position(
            trader,
            position.position_id,
            shares,
            max_payment,
            now,
            |quote| self.ledger.debit(trader, quote.total).map_err(EngineError::from),
        )?;

        self.trade_executed(&position.market_id, &receipt, Event::SharesBought {
            market_id: position.market_id.clone(),
            receipt: receipt.clone(),
        });
        Ok(receipt)
    }

    /// Sell `shares` from a position.
    ///
    /// # Errors
    ///
    /// `TradingPaused`, `MarketNotFound`, everything [`Market::sell`]
    /// returns, and `PaymentFailed` if the ledger refuses the credit.
    pub fn sell(
        &self,
        trader: &AccountId,
        position: &PositionRef,
        shares: u64,
    ) -> Result<TradeReceipt, EngineError> {
        self.ensure_trading()?;
        let cell = self.market(&position.market_id)?;
        let mut market = cell.lock();
        let now = self.clock.now();

        let receipt = market.sell(trader, position.position_id, shares, now, |net| {
            self.ledger.credit(trader, net).map_err(EngineError::from)
        })?;

        self.trade_executed(&position.market_id, &receipt, Event::SharesSold {
            market_id: position.market_id.clone(),
            receipt: receipt.clone(),
        });
        Ok(receipt)
    }

    /// Redeem a position of a resolved market, consuming it.
    ///
    /// Not affected by the trading pause.
    ///
    /// # Errors
    ///
    /// `MarketNotFound`, everything [`Market::redeem`] returns, and
    /// `PaymentFailed` if the ledger refuses the credit.
    pub fn redeem(
        &self,
        owner: &AccountId,
        position: &PositionRef,
    ) -> Result<Redemption, EngineError> {
        let cell = self.market(&position.market_id)?;
        let mut market = cell.lock();

        let redemption = market.redeem(owner, position.position_id, |payout| {
            if payout == 0 {
                return Ok(());
            }
            self.ledger.credit(owner, payout).map_err(EngineError::from)
        })?;

        info!(
            market_id = %position.market_id,
            position_id = %position.position_id,
            owner = %owner,
            payout = redemption.payout,
            "Position redeemed"
        );
        self.notifier.notify(Event::redeemed(&redemption));
        Ok(redemption)
    }

    /// Apply a settlement outcome. Reachable only from the settlement engine,
    /// which is the sole holder of a [`ResolutionAuthority`].
    pub(crate) fn resolve(
        &self,
        market_id: &MarketId,
        outcome: Outcome,
        source: ResolutionSource,
        authority: &ResolutionAuthority,
    ) -> Result<chrono::DateTime<chrono::Utc>, EngineError> {
        let cell = self.market(market_id)?;
        let mut market = cell.lock();
        let now = self.clock.now();

        market.resolve(outcome, now, authority)?;

        info!(market_id = %market_id, outcome = %outcome, ?source, "Market resolved");
        self.notifier.notify(Event::MarketResolved {
            market_id: market_id.clone(),
            outcome,
            source,
        });
        Ok(now)
    }

    /// Run `f` against a market under its lock.
    ///
    /// # Errors
    ///
    /// `MarketNotFound`.
    pub fn inspect<R>(
        &self,
        market_id: &MarketId,
        f: impl FnOnce(&Market) -> R,
    ) -> Result<R, EngineError> {
        let cell = self.market(market_id)?;
        let market = cell.lock();
        Ok(f(&market))
    }

    /// # Errors
    ///
    /// `MarketNotFound`.
    pub fn market_snapshot(&self, market_id: &MarketId) -> Result<MarketSnapshot, EngineError> {
        let now = self.clock.now();
        self.inspect(market_id, |m| m.snapshot(now))?
    }

    /// Implied probability of `outcome`.
    ///
    /// # Errors
    ///
    /// `MarketNotFound`.
    pub fn get_price(&self, market_id: &MarketId, outcome: Outcome) -> Result<u64, EngineError> {
        Ok(self.get_prices(market_id)?.of(outcome))
    }

    /// # Errors
    ///
    /// `MarketNotFound`.
    pub fn get_prices(&self, market_id: &MarketId) -> Result<Prices, EngineError> {
        self.inspect(market_id, Market::prices)?
    }

    /// The position `owner` holds on `outcome`, found through the market's
    /// holder index.
    ///
    /// # Errors
    ///
    /// `MarketNotFound`.
    pub fn get_position(
        &self,
        owner: &AccountId,
        market_id: &MarketId,
        outcome: Outcome,
    ) -> Result<Option<Position>, EngineError> {
        self.inspect(market_id, |m| m.positions().find(owner, outcome).cloned())
    }

    /// Every position held by `owner` across all markets.
    pub fn positions_of(&self, owner: &AccountId) -> Vec<Position> {
        let mut held: Vec<Position> = self
            .cells()
            .into_iter()
            .flat_map(|cell| {
                let market = cell.lock();
                market
                    .positions()
                    .held_by(owner)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        held.sort_by(|a, b| a.market_id().cmp(b.market_id()).then(a.id().cmp(&b.id())));
        held
    }

    /// # Errors
    ///
    /// `MarketNotFound`.
    pub fn get_market_balance(&self, market_id: &MarketId) -> Result<u64, EngineError> {
        self.inspect(market_id, Market::collateral_balance)
    }

    /// # Errors
    ///
    /// `MarketNotFound`.
    pub fn is_market_resolved(&self, market_id: &MarketId) -> Result<bool, EngineError> {
        self.inspect(market_id, Market::is_resolved)
    }

    /// Price a buy without executing it.
    ///
    /// # Errors
    ///
    /// `MarketNotFound` and the curve's errors.
    pub fn quote_buy(
        &self,
        market_id: &MarketId,
        outcome: Outcome,
        shares: u64,
    ) -> Result<BuyQuote, EngineError> {
        self.inspect(market_id, |m| m.quote_buy(outcome, shares))?
    }

    /// Price a sell without executing it.
    ///
    /// # Errors
    ///
    /// `MarketNotFound` and the curve's errors.
    pub fn quote_sell(
        &self,
        market_id: &MarketId,
        outcome: Outcome,
        shares: u64,
    ) -> Result<SellQuote, EngineError> {
        self.inspect(market_id, |m| m.quote_sell(outcome, shares))?
    }

    /// Markets in `category`, in creation order.
    pub fn markets_by_category(&self, category: Category) -> Vec<MarketId> {
        self.by_category
            .get(&category)
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }

    /// Snapshots of all markets, oldest first.
    pub fn list_markets(&self) -> Vec<MarketSnapshot> {
        let now = self.clock.now();
        let mut snapshots: Vec<MarketSnapshot> = self
            .cells()
            .into_iter()
            .filter_map(|cell| cell.lock().snapshot(now).ok())
            .collect();
        snapshots.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        snapshots
    }

    /// Markets past their deadline that still await an outcome.
    pub fn awaiting_resolution(&self) -> Vec<MarketId> {
        let now = self.clock.now();
        let mut due: Vec<MarketId> = self
            .cells()
            .into_iter()
            .filter_map(|cell| {
                let market = cell.lock();
                (market.phase(now) == MarketPhase::AwaitingResolution).then(|| market.id().clone())
            })
            .collect();
        due.sort();
        due
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Change the fee charged by markets created from now on.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the admin, `InvalidFee` above the cap.
    pub fn set_fee_bps(&self, caller: &AccountId, fee_bps: u64) -> Result<(), EngineError> {
        {
            let mut config = self.config.write();
            config.authorize(caller, "change the trading fee")?;
            config.set_fee_bps(fee_bps)?;
        }
        info!(fee_bps, "Global fee updated");
        self.notifier.notify(Event::FeeUpdated { fee_bps });
        Ok(())
    }

    /// Halt or resume buying and selling across every market.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the admin.
    pub fn set_trading_paused(&self, caller: &AccountId, paused: bool) -> Result<(), EngineError> {
        {
            let mut config = self.config.write();
            config.authorize(caller, "pause trading")?;
            config.set_trading_paused(paused);
        }
        info!(paused, "Trading pause toggled");
        self.notifier.notify(Event::TradingPaused { paused });
        Ok(())
    }

    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the admin.
    pub fn authorize(&self, caller: &AccountId, action: &'static str) -> Result<(), EngineError> {
        self.config.read().authorize(caller, action)
    }

    fn ensure_trading(&self) -> Result<(), EngineError> {
        if self.is_trading_paused() {
            return Err(EngineError::TradingPaused);
        }
        Ok(())
    }

    fn market(&self, market_id: &MarketId) -> Result<MarketCell, EngineError> {
        self.markets
            .get(market_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::MarketNotFound {
                market_id: market_id.clone(),
            })
    }

    /// Clone out every market handle so no map shard is held while locking.
    fn cells(&self) -> Vec<MarketCell> {
        self.markets
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    fn trade_executed(&self, market_id: &MarketId, receipt: &TradeReceipt, event: Event) {
        debug!(
            market_id = %market_id,
            trader = %receipt.trader,
            side = ?receipt.side,
            outcome = %receipt.outcome,
            shares = receipt.shares,
            amount = receipt.amount,
            fee = receipt.fee,
            yes_price = receipt.prices_after.yes,
            "Trade executed"
        );
        self.notifier.notify(event);
    }
}
