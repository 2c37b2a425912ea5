//! Shared CLI output helpers for consistent operator-facing text.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{to_decimal, DisplayQuote, Prices};
use crate::error::Result;

const RULE_WIDTH: usize = 56;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a simple key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<18} {value}");
}

/// Print a successful status line.
pub fn ok(message: &str) {
    println!("✓ {message}");
}

/// Print an error status line.
pub fn error(message: &str) {
    eprintln!("✗ {message}");
}

/// Base units rendered as a decimal amount.
pub fn amount(base_units: u64) -> Decimal {
    to_decimal(base_units).normalize()
}

/// Print both sides' prices as cents, with and without the display spread.
pub fn prices(label: &str, prices: &Prices) {
    let mid = DisplayQuote::mid(prices);
    let shown = DisplayQuote::with_spread(prices, &Default::default());
    key_value(
        label,
        format!(
            "YES {}¢ / NO {}¢  (displayed {}¢ / {}¢)",
            mid.yes_cents.round_dp(2),
            mid.no_cents.round_dp(2),
            shown.yes_cents,
            shown.no_cents
        ),
    );
}

/// Print a value as pretty JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
