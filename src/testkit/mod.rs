//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`oracle`]: `ScriptedOracle`, a price feed that replays a fixed script.
//! - [`notifier`]: `RecordingNotifier`, collects published events.
//! - [`domain`]: Builders for markets and a fully wired in-memory engine.
//! - [`config`]: Canonical test configurations (settlement timing, engine).

pub mod config;
pub mod domain;
pub mod notifier;
pub mod oracle;

pub use crate::adapter::ManualClock;
