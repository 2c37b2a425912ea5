//! Command-line interface definitions.

pub mod args;
pub mod check;
pub mod output;
pub mod quote;
pub mod simulate;

pub use args::{CheckCommand, Cli, Commands, ConfigPathArg, QuoteArgs, SimulateArgs};
