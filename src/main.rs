use anyhow::Context;
use api_client::BinanceClient;
use clap::Parser;
use configuration::{load_config, OutputFormat, DEFAULT_CONFIG_PATH};
use engine::{EngineError, RunOptions, Runner};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Read-only snapshot of balances and open futures positions across several Binance accounts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the accounts file.
    #[arg(long, env = "PORTFOLIO_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Output format. Overrides `report.format`.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Include the spot balance table.
    #[arg(long)]
    spot: bool,

    /// Fetch accounts concurrently. Report order is unchanged.
    #[arg(long)]
    concurrent: bool,
}

/// The main entry point for the portfolio viewer.
#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the accounts file is the real source.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = match load_config(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Setup error: {}", e);
            eprintln!(
                "Create {} with at least one [[accounts]] entry (name, api_key, api_secret, testnet).",
                cli.config.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match configuration::init_tracing(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Setup error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut options = RunOptions::from(&settings.report);
    options.include_spot |= cli.spot;
    options.concurrent |= cli.concurrent;
    if let Some(format) = cli.format {
        options.format = format;
    }

    match run(&settings, options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", error_label(&e), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &configuration::Settings, options: RunOptions) -> anyhow::Result<()> {
    let client = BinanceClient::new(&settings.http).context("Failed to build the HTTP client")?;
    let runner = Runner::new(&settings.accounts, Arc::new(client), options)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = runner.run(&mut out).await?;
    tracing::debug!(?summary, "Run complete.");
    Ok(())
}

/// Setup problems are worded like config errors; anything else is a plain error.
fn error_label(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<EngineError>() {
        Some(e) if e.is_setup_error() => "Setup error",
        _ => "Error",
    }
}
