//! Price oracle adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::PriceReading;
use crate::port::{OracleError, PriceOracle};

/// Oracle serving whatever readings were last published to it.
///
/// Used by the simulator and by hosts that receive prices by push rather
/// than pull.
#[derive(Debug, Default)]
pub struct FixedPriceOracle {
    readings: RwLock<HashMap<String, PriceReading>>,
}

impl FixedPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a reading for `identifier`, replacing any previous one.
    pub fn publish(&self, identifier: impl Into<String>, reading: PriceReading) {
        self.readings.write().insert(identifier.into(), reading);
    }
}

#[async_trait]
impl PriceOracle for FixedPriceOracle {
    async fn get_price(&self, identifier: &str) -> Result<PriceReading, OracleError> {
        self.readings
            .read()
            .get(identifier)
            .copied()
            .ok_or_else(|| OracleError::UnknownFeed(identifier.to_string()))
    }
}
