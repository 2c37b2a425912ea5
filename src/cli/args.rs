//! Argument definitions for the `outcome-amm` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::Outcome;

/// Outcome AMM - binary prediction markets on a constant-product curve.
#[derive(Parser, Debug)]
#[command(name = "outcome-amm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Price a trade against a pair of reserves
    Quote(QuoteArgs),

    /// Run a scripted market lifecycle in memory
    Simulate(SimulateArgs),
}

/// Subcommands for `outcome-amm check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `quote` subcommand. Amounts are in whole units.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// YES reserve
    #[arg(long, default_value = "100")]
    pub yes: Decimal,

    /// NO reserve
    #[arg(long, default_value = "100")]
    pub no: Decimal,

    /// Side being traded (yes or no)
    #[arg(long)]
    pub outcome: Outcome,

    /// Shares to buy or sell
    #[arg(long)]
    pub shares: Decimal,

    /// Trading fee in basis points
    #[arg(long, default_value_t = 10)]
    pub fee_bps: u64,

    /// Quote a sell instead of a buy
    #[arg(long)]
    pub sell: bool,

    /// Print the quote as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `simulate` subcommand.
#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Oracle price reported at settlement
    #[arg(long, default_value_t = 105_000)]
    pub settle_price: u64,

    /// Print the final market snapshot as JSON
    #[arg(long)]
    pub json: bool,
}
