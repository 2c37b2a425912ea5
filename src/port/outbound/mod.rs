//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collateral ledger, the clock, the price
//! oracle and event notifications.

pub mod clock;
pub mod ledger;
pub mod notifier;
pub mod oracle;
