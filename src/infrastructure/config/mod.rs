//! Infrastructure configuration modules.

pub mod engine;
pub mod logging;
pub mod settings;
pub mod settlement;

pub use engine::{FeesConfig, GovernanceConfig, MarketsConfig};
pub use logging::LoggingConfig;
pub use settings::Config;
pub use settlement::SettlementConfig;
