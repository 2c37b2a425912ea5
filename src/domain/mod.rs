//! Exchange-agnostic domain logic: pure, synchronous, no I/O.

pub mod config;
pub mod curve;
pub mod display;
pub mod event;
pub mod id;
pub mod market;
pub mod math;
pub mod money;
pub mod oracle;
pub mod position;
pub mod trade;

pub use config::{GlobalConfig, MarketDefaults};
pub use curve::{BondingCurve, BuyQuote, Prices, Reserves, SellQuote, PRICE_SCALE};
pub use display::{DisplayQuote, DisplaySpread};
pub use event::{Event, ResolutionSource};
pub use id::{AccountId, MarketId, PositionId};
pub use market::{
    Category, Market, MarketPhase, MarketSnapshot, NewMarket, Outcome, Outstanding, Resolution,
    ResolutionAuthority,
};
pub use money::{from_decimal, to_decimal, BPS_DENOMINATOR, DECIMALS, UNIT};
pub use oracle::{Comparison, PriceReading};
pub use position::{Position, PositionBook, PositionRef};
pub use trade::{Redemption, Side, TradeReceipt};
