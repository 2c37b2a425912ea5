//! Application services (use cases).
//!
//! These services coordinate domain logic with the injected adapters:
//! [`MarketRegistry`] owns markets and routes trades through the ledger,
//! [`SettlementEngine`] resolves them from an oracle.

pub mod registry;
pub mod retry;
pub mod settlement;

pub use registry::MarketRegistry;
pub use retry::{BackoffStrategy, RetryPolicy};
pub use settlement::{Settlement, SettlementEngine, SettlementPolicy};
