use std::path::Path;

use super::output;
use crate::domain::to_decimal;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate a configuration file without running anything.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());

    let config = Config::load(path)?;
    output::ok("Configuration file is valid");

    output::section("Summary");
    output::key_value("Fee", format!("{} bps (cap {})", config.fees.fee_bps, config.fees.max_fee_bps));
    output::key_value("Admin", &config.governance.admin);
    output::key_value(
        "Virtual liquidity",
        to_decimal(config.markets.virtual_liquidity).normalize(),
    );
    output::key_value("Min duration", format!("{}s", config.markets.min_duration_secs));
    output::key_value("Grace period", format!("{}s", config.settlement.grace_period_secs));
    output::key_value("Max staleness", format!("{}s", config.settlement.max_staleness_secs));

    let retry = &config.settlement.retry;
    let delays: Vec<String> = retry
        .schedule()
        .map(|d| format!("{}ms", d.as_millis()))
        .collect();
    output::key_value(
        "Oracle retries",
        format!("{} attempts, {:?} [{}]", retry.max_attempts, retry.strategy, delays.join(", ")),
    );
    output::key_value("Logging", format!("{} ({})", config.logging.level, config.logging.format));

    println!();
    println!("Configuration is ready to use.");
    Ok(())
}
