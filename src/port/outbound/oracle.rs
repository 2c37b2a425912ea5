//! Price oracle port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::PriceReading;

/// Failures reported by a price feed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("unknown price feed: {0}")]
    UnknownFeed(String),

    #[error("price feed unavailable: {0}")]
    Unavailable(String),
}

/// External price feed consumed only by the settlement engine.
///
/// This is the one asynchronous collaborator; it may perform network I/O.
/// The settlement engine bounds each call with a timeout and retries
/// according to its policy, so implementations should not retry internally.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Latest reading for the feed `identifier`.
    async fn get_price(&self, identifier: &str) -> Result<PriceReading, OracleError>;
}
