//! Implementations of ports (hexagonal adapters).

pub mod outbound;

pub use outbound::clock::{ManualClock, SystemClock};
pub use outbound::ledger::InMemoryLedger;
pub use outbound::notifier::LogNotifier;
pub use outbound::oracle::FixedPriceOracle;
