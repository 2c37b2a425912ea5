use std::io::Write;

use outcome_amm::error::{ConfigError, Error};
use outcome_amm::infrastructure::config::Config;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

fn load(contents: &str) -> Result<Config, Error> {
    let file = write_temp_config(contents);
    Config::load(file.path())
}

#[test]
fn config_loads_full_file() {
    let toml = r#"
[fees]
fee_bps = 25
max_fee_bps = 500

[governance]
admin = "council"

[markets]
virtual_liquidity = 250000000
min_duration_secs = 3600

[settlement]
grace_period_secs = 7200
max_staleness_secs = 120
attempt_timeout_ms = 2500

[settlement.retry]
max_attempts = 5
initial_delay_ms = 200
max_delay_ms = 1000
strategy = "fixed"

[logging]
level = "debug"
format = "json"
"#;

    let config = load(toml).expect("valid config");

    assert_eq!(config.fees.fee_bps, 25);
    assert_eq!(config.governance.admin, "council");
    let global = config.global_config().unwrap();
    assert_eq!(global.fee_bps(), 25);
    assert_eq!(config.market_defaults().virtual_liquidity, 250_000_000);

    let policy = config.settlement_policy();
    assert_eq!(policy.grace_period, chrono::Duration::hours(2));
    assert_eq!(policy.max_staleness, chrono::Duration::minutes(2));
    assert_eq!(policy.attempt_timeout, std::time::Duration::from_millis(2500));
    assert_eq!(policy.retry.max_attempts, 5);
    assert_eq!(policy.retry.schedule().count(), 4);
}

#[test]
fn empty_file_uses_defaults() {
    let config = load("").expect("defaults are valid");

    assert_eq!(config.fees.fee_bps, 10);
    assert_eq!(config.governance.admin, "governance");
    assert_eq!(config.settlement.retry.max_attempts, 3);
    assert_eq!(config.logging.format, "pretty");
}

#[test]
fn config_rejects_fee_above_cap() {
    let toml = r#"
[fees]
fee_bps = 600
max_fee_bps = 500
"#;

    match load(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "fee_bps", ..
        })) => {}
        Err(err) => panic!("Expected invalid fee error, got {err}"),
        Ok(config) => panic!("Expected fee to be rejected, got {}", config.fees.fee_bps),
    }
}

#[test]
fn config_rejects_blank_admin() {
    let toml = r#"
[governance]
admin = "   "
"#;

    assert!(matches!(
        load(toml),
        Err(Error::Config(ConfigError::MissingField { field: "admin" }))
    ));
}

#[test]
fn config_rejects_zero_retry_attempts() {
    let toml = r#"
[settlement.retry]
max_attempts = 0
"#;

    assert!(matches!(
        load(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_attempts",
            ..
        }))
    ));
}

#[test]
fn config_rejects_unknown_log_format() {
    let toml = r#"
[logging]
format = "xml"
"#;

    assert!(matches!(
        load(toml),
        Err(Error::Config(ConfigError::InvalidValue { field: "format", .. }))
    ));
}

#[test]
fn config_reports_malformed_toml() {
    assert!(matches!(
        load("[fees\nfee_bps = 1"),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn config_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = Config::load(dir.path().join("absent.toml"));

    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}
