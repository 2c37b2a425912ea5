//! Outbound adapters implementing the driven ports.

pub mod clock;
pub mod ledger;
pub mod notifier;
pub mod oracle;
