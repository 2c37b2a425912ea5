//! Scripted price feed for settlement tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::PriceReading;
use crate::port::{OracleError, PriceOracle};

/// One scripted response.
#[derive(Debug, Clone)]
pub enum Step {
    Reading(PriceReading),
    Fail(OracleError),
    /// Answer with the reading only after `delay`.
    Slow(Duration, PriceReading),
}

/// Oracle that answers calls from a script, in order.
///
/// Once the script runs out every call fails with `Unavailable`. The feed
/// identifier of each call is recorded.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    feeds: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    /// An oracle whose every call fails.
    pub fn down() -> Self {
        Self::default()
    }

    pub fn push(&self, step: Step) {
        self.script.lock().push_back(step);
    }

    /// Number of `get_price` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Feed identifiers requested, in call order.
    pub fn feeds(&self) -> Vec<String> {
        self.feeds.lock().clone()
    }
}

#[async_trait]
impl PriceOracle for ScriptedOracle {
    async fn get_price(&self, identifier: &str) -> Result<PriceReading, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.feeds.lock().push(identifier.to_string());
        let step = self.script.lock().pop_front();
        match step {
            Some(Step::Reading(reading)) => Ok(reading),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Slow(delay, reading)) => {
                tokio::time::sleep(delay).await;
                Ok(reading)
            }
            None => Err(OracleError::Unavailable("script exhausted".into())),
        }
    }
}
