//! Outcome AMM - binary prediction markets priced by a constant-product curve.
//!
//! Each market trades two outcome shares, YES and NO, against pooled
//! collateral. Prices come from virtual reserves on a `yes * no = k` curve,
//! so they always sum to one and move smoothly with demand. After the
//! deadline an oracle reading settles the market and every winning share
//! redeems for one unit of collateral.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **[`domain`]** - Pure, synchronous rules: fixed-point math, the
//!   [`BondingCurve`](domain::BondingCurve), [`Market`](domain::Market),
//!   positions and lifecycle events.
//! - **[`port`]** - Collaborator traits: ledger, clock, price oracle, notifier.
//! - **[`adapter`]** - In-memory and logging implementations of the ports.
//! - **[`application`]** - [`MarketRegistry`](application::MarketRegistry)
//!   and [`SettlementEngine`](application::SettlementEngine).
//! - **[`infrastructure`]** - TOML configuration, logging and wiring.
//! - **[`cli`]** - The `outcome-amm` command-line interface.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use outcome_amm::adapter::{InMemoryLedger, SystemClock};
//! use outcome_amm::application::MarketRegistry;
//! use outcome_amm::domain::{AccountId, GlobalConfig, MarketDefaults};
//!
//! let config = GlobalConfig::new(10, 1000, AccountId::from("governance")).unwrap();
//! let registry = MarketRegistry::new(
//!     config,
//!     MarketDefaults::default(),
//!     Arc::new(InMemoryLedger::new()),
//!     Arc::new(SystemClock::new()),
//! );
//! assert!(registry.is_empty());
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
