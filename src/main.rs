//! xchain-conformance - cross-chain aggregator conformance and load harness

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use xchain_conformance::adapters::cli::{self, CliApp};
use xchain_conformance::config::{load_config, HarnessConfig};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if it exists (API keys go here, not in config.toml)
    dotenvy::dotenv().ok();

    let app = cli::init();
    let config = build_config(&app)?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    let passed = cli::execute(app, config).await?;
    Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn build_config(app: &CliApp) -> Result<HarnessConfig> {
    let mut config = match app.config {
        Some(ref path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
            load_config(&expanded).with_context(|| format!("Failed to load configuration from {}", expanded))?
        }
        None => HarnessConfig::default(),
    };
    config.apply_env_overrides();
    config.validate().context("Invalid configuration after environment overrides")?;
    Ok(config)
}

fn init_logging(verbose: bool, debug: bool, level: &str) -> Result<()> {
    let fallback = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        level
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
