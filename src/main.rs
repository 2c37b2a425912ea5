use anyhow::Context;
use clap::Parser;
use tracing::info;

use outcome_amm::cli::{self, CheckCommand, Cli, Commands};
use outcome_amm::infrastructure::config::{Config, LoggingConfig};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        cli::output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check(CheckCommand::Config(args)) => {
            cli::check::execute_config(&args.config)
                .with_context(|| format!("invalid configuration {}", args.config.display()))?;
        }
        Commands::Quote(args) => {
            cli::quote::execute(&args).context("quote failed")?;
        }
        Commands::Simulate(args) => {
            let logging = match &args.config {
                Some(path) => Config::load(path)
                    .with_context(|| format!("invalid configuration {}", path.display()))?
                    .logging,
                None => LoggingConfig::default(),
            };
            logging.init();
            info!("outcome-amm simulation starting");
            cli::simulate::execute(&args).await.context("simulation failed")?;
            info!("outcome-amm simulation finished");
        }
    }
    Ok(())
}
