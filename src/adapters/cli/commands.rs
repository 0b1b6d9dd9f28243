//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the conformance harness.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::lifi::{LiFiClient, LiFiConfig};
use crate::api::{Endpoint, QuoteParams, RouteOrder};
use crate::application::{
    filter_cases, run_case, standard_suite, CaseKind, CaseStatus, RunnerConfig, SuiteCase, SuiteFilter, SuiteRunner,
};
use crate::assertions::QuoteExpectation;
use crate::catalog::ScenarioCatalog;
use crate::config::HarnessConfig;
use crate::domain::{ChainId, FixtureRegistry, Tag};
use crate::load::{LoadDriver, LoadProfile, LoadScenario, LoadScript, LoadTarget, PayloadPool, Thresholds};
use crate::ports::AggregatorApi;
use crate::schema::CompiledSchemas;

/// xchain-conformance - conformance and load harness for cross-chain swap APIs
#[derive(Parser, Debug)]
#[command(
    name = "xchain-conformance",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Conformance and load harness for cross-chain swap/bridge aggregator APIs",
    long_about = "Runs schema and business-invariant checks against a LI.FI-style aggregator \
                  (quote, routes, tools, tokens) and drives staged load profiles against it."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the functional conformance suite
    Run(RunCmd),

    /// Run a load profile against one endpoint
    Load(LoadCmd),

    /// List scenario and negative cases
    Catalog(CatalogCmd),

    /// Fetch and validate a single quote
    Quote(QuoteCmd),
}

/// Run the functional suite
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Only run cases with this tag (repeatable, e.g. --tag smoke)
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<Tag>,

    /// Only run cases against this endpoint (repeatable)
    #[arg(short, long, value_name = "ENDPOINT")]
    pub endpoint: Vec<Endpoint>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Run a load profile
#[derive(Parser, Debug)]
pub struct LoadCmd {
    /// smoke, load or stress (defaults to config / LOAD_SCENARIO)
    #[arg(short, long, value_name = "SCENARIO")]
    pub scenario: Option<LoadScenario>,

    /// quote, routes or tools (defaults to config)
    #[arg(short, long, value_name = "ENDPOINT")]
    pub endpoint: Option<LoadTarget>,

    /// Multiply every stage duration and think time by this factor
    #[arg(long, value_name = "FACTOR", default_value = "1.0")]
    pub time_scale: f64,

    /// Also write the JSON summary to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// List catalog cases
#[derive(Parser, Debug)]
pub struct CatalogCmd {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Fetch one quote
#[derive(Parser, Debug)]
pub struct QuoteCmd {
    /// Name of a catalog happy-path pair (case-insensitive)
    #[arg(long, value_name = "NAME", conflicts_with_all = ["from_chain", "to_chain", "from_token", "to_token", "amount"])]
    pub pair: Option<String>,

    /// Source chain id (e.g., 1)
    #[arg(value_name = "FROM_CHAIN", required_unless_present = "pair")]
    pub from_chain: Option<u64>,

    /// Destination chain id (e.g., 137)
    #[arg(value_name = "TO_CHAIN", required_unless_present = "pair")]
    pub to_chain: Option<u64>,

    /// Source token symbol or address
    #[arg(value_name = "FROM_TOKEN", required_unless_present = "pair")]
    pub from_token: Option<String>,

    /// Destination token symbol or address
    #[arg(value_name = "TO_TOKEN", required_unless_present = "pair")]
    pub to_token: Option<String>,

    /// Amount in the source token's smallest unit
    #[arg(value_name = "AMOUNT", required_unless_present = "pair")]
    pub amount: Option<String>,

    /// Sender address (defaults to the fixture EVM address)
    #[arg(long, value_name = "ADDRESS")]
    pub from_address: Option<String>,

    /// Slippage as a fraction (e.g., 0.005)
    #[arg(long, value_name = "FRACTION")]
    pub slippage: Option<f64>,

    /// Prefer the cheapest route
    #[arg(long)]
    pub cheapest: bool,

    /// Print the raw quote body
    #[arg(long)]
    pub raw: bool,
}

/// Execute the CLI command; `Ok(false)` means checks ran and something failed
pub async fn execute(app: CliApp, config: HarnessConfig) -> Result<bool> {
    match app.command {
        Command::Run(cmd) => run_command(cmd, &config).await,
        Command::Load(cmd) => load_command(cmd, &config).await,
        Command::Catalog(cmd) => catalog_command(cmd),
        Command::Quote(cmd) => quote_command(cmd, &config).await,
    }
}

fn build_client(config: LiFiConfig) -> Result<Arc<dyn AggregatorApi>> {
    let client = LiFiClient::with_config(config).context("Failed to create API client")?;
    tracing::info!("Using API at {}", client.base_url());
    Ok(Arc::new(client))
}

fn build_catalog() -> Result<(FixtureRegistry, ScenarioCatalog)> {
    let fixtures = FixtureRegistry::standard();
    let catalog = ScenarioCatalog::standard(&fixtures).context("Scenario catalog is inconsistent")?;
    Ok((fixtures, catalog))
}

/// Handle run command
async fn run_command(cmd: RunCmd, config: &HarnessConfig) -> Result<bool> {
    let (fixtures, catalog) = build_catalog()?;
    let schemas = Arc::new(CompiledSchemas::standard().context("Failed to compile response schemas")?);

    let tags = if cmd.tag.is_empty() { config.suite_tags()? } else { cmd.tag };
    let filter = SuiteFilter::all().with_tags(tags).with_endpoints(cmd.endpoint);
    let cases = filter_cases(standard_suite(&catalog, &fixtures), &filter);
    if cases.is_empty() {
        anyhow::bail!("No cases match the selected tags and endpoints");
    }

    let runner = SuiteRunner::new(build_client(LiFiConfig::from(config))?, schemas, RunnerConfig::from(config));
    let report = runner.run(cases).await;

    let json = report.to_json().context("Failed to serialize report")?;
    if let Some(ref path) = cmd.output {
        std::fs::write(path, &json).with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }
    if cmd.json {
        println!("{}", json);
    } else {
        print!("{}", report.render_text());
    }

    Ok(report.is_success())
}

/// Handle load command
async fn load_command(cmd: LoadCmd, config: &HarnessConfig) -> Result<bool> {
    if cmd.time_scale <= 0.0 || !cmd.time_scale.is_finite() {
        anyhow::bail!("--time-scale must be > 0, got {}", cmd.time_scale);
    }
    let scenario = match cmd.scenario {
        Some(s) => s,
        None => config.load_scenario()?,
    };
    let target = match cmd.endpoint {
        Some(t) => t,
        None => config.load_target()?,
    };

    let (fixtures, _) = build_catalog()?;
    let pool = PayloadPool::standard(target, &fixtures)?;
    let profile = LoadProfile::for_scenario(scenario).scaled(cmd.time_scale);
    let script = LoadScript::new(target, scenario)
        .with_think_time(target.think_time().mul_f64(cmd.time_scale))
        .with_thresholds(Thresholds::new(target.p95_limit()).with_min_throughput(config.load.min_throughput));

    let driver = Arc::new(LoadDriver::new(build_client(config.load_client_config())?, script, profile, pool));

    let stopper = Arc::clone(&driver);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
        stopper.stop().await;
    });

    let summary = driver.run().await?;
    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize load summary")?;
    if let Some(ref path) = cmd.output {
        std::fs::write(path, &json).with_context(|| format!("Failed to write summary to {}", path.display()))?;
    }
    println!("{}", json);

    Ok(summary.passed())
}

/// Handle catalog command
fn catalog_command(cmd: CatalogCmd) -> Result<bool> {
    let (_, catalog) = build_catalog()?;

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&catalog).context("Failed to serialize catalog")?);
        }
        OutputFormat::Text => {
            println!("Happy-path pairs ({}):", catalog.happy_path.len());
            for pair in &catalog.happy_path {
                println!(
                    "  {:<7} {} -> {}  {} {} -> {}  {}",
                    pair.transfer_type.to_string(),
                    pair.from_chain,
                    pair.to_chain,
                    pair.from_amount,
                    pair.from_token,
                    pair.to_token,
                    pair.display_name()
                );
            }

            println!("\nListing-only chains ({}):", catalog.listing_chains.len());
            for chain in &catalog.listing_chains {
                println!("  {:<20} {} ({})", chain.display_name, chain.id, chain.chain_type);
            }

            println!("\nNegative cases ({}):", catalog.negative.len());
            for case in &catalog.negative {
                let statuses: Vec<String> = case.expected.statuses.iter().map(u16::to_string).collect();
                println!("  [{}] {:<16} {}", statuses.join("|"), case.endpoint.to_string(), case.name);
                println!("        {}", case.request.describe());
            }
        }
    }
    Ok(true)
}

/// Handle quote command
async fn quote_command(cmd: QuoteCmd, config: &HarnessConfig) -> Result<bool> {
    let (fixtures, catalog) = build_catalog()?;
    let from_address = cmd
        .from_address
        .clone()
        .unwrap_or_else(|| fixtures.addresses.evm_default.clone());

    let mut params = match cmd.pair {
        Some(ref name) => {
            let pair = catalog
                .happy_path
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(name))
                .with_context(|| format!("No catalog pair named '{}'", name))?;
            QuoteParams::from_scenario(pair, &from_address)
        }
        None => QuoteParams::new(
            ChainId(cmd.from_chain.context("FROM_CHAIN is required")?),
            ChainId(cmd.to_chain.context("TO_CHAIN is required")?),
            cmd.from_token.clone().context("FROM_TOKEN is required")?,
            cmd.to_token.clone().context("TO_TOKEN is required")?,
            cmd.amount.clone().context("AMOUNT is required")?,
            from_address,
        ),
    };
    if let Some(slippage) = cmd.slippage {
        params = params.with_slippage(slippage);
    }
    if cmd.cheapest {
        params = params.with_order(RouteOrder::Cheapest);
    }

    let case = SuiteCase::new(
        "quote",
        std::iter::empty::<Tag>(),
        CaseKind::Quote {
            expectation: QuoteExpectation::for_params(&params),
            params,
        },
    );
    let schemas = CompiledSchemas::standard().context("Failed to compile response schemas")?;
    let client = build_client(LiFiConfig::from(config))?;
    let outcome = run_case(client.as_ref(), &schemas, &case, &RunnerConfig::from(config)).await;

    println!("{}", outcome.request);
    match outcome.status {
        CaseStatus::Passed => println!("✓ quote conforms ({}ms)", outcome.elapsed_ms),
        ref other => println!("✗ {}: {:?}", other.label(), other),
    }
    for warning in &outcome.warnings {
        println!("  warning: {}", warning);
    }
    if let Some(ref body) = outcome.response_body {
        if cmd.raw {
            println!("{}", serde_json::to_string_pretty(body)?);
        } else if let Some(estimate) = body.get("estimate") {
            println!(
                "  toAmount: {}  toAmountMin: {}  tool: {}",
                estimate.get("toAmount").and_then(|v| v.as_str()).unwrap_or("-"),
                estimate.get("toAmountMin").and_then(|v| v.as_str()).unwrap_or("-"),
                body.get("tool").and_then(|v| v.as_str()).unwrap_or("-"),
            );
        }
    }

    Ok(outcome.status.is_passed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliApp::command().debug_assert();
    }

    #[test]
    fn test_parse_run_filters() {
        let app = CliApp::parse_from([
            "xchain-conformance",
            "run",
            "--tag",
            "smoke",
            "--tag",
            "@negative",
            "--endpoint",
            "routes",
            "--json",
        ]);
        match app.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.tag, vec![Tag::Smoke, Tag::Negative]);
                assert_eq!(cmd.endpoint, vec![Endpoint::Routes]);
                assert!(cmd.json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_load_with_global_flags() {
        let app = CliApp::parse_from([
            "xchain-conformance",
            "load",
            "--scenario",
            "smoke",
            "--endpoint",
            "tools",
            "--config",
            "harness.toml",
            "--verbose",
        ]);
        assert!(app.verbose);
        assert_eq!(app.config, Some(PathBuf::from("harness.toml")));
        match app.command {
            Command::Load(cmd) => {
                assert_eq!(cmd.scenario, Some(LoadScenario::Smoke));
                assert_eq!(cmd.endpoint, Some(LoadTarget::Tools));
                assert_eq!(cmd.time_scale, 1.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_quote_positional_or_pair() {
        let app = CliApp::parse_from(["xchain-conformance", "quote", "1", "137", "USDC", "USDC", "1000000"]);
        match app.command {
            Command::Quote(cmd) => {
                assert_eq!(cmd.from_chain, Some(1));
                assert_eq!(cmd.amount.as_deref(), Some("1000000"));
            }
            other => panic!("unexpected command {:?}", other),
        }

        let app = CliApp::parse_from(["xchain-conformance", "quote", "--pair", "ETH to USDC swap on Ethereum"]);
        assert!(matches!(app.command, Command::Quote(ref cmd) if cmd.pair.is_some()));

        assert!(CliApp::try_parse_from(["xchain-conformance", "quote", "1"]).is_err());
    }

    #[test]
    fn test_unknown_scenario_is_rejected_by_parser() {
        assert!(CliApp::try_parse_from(["xchain-conformance", "load", "--scenario", "soak"]).is_err());
    }

    #[test]
    fn test_catalog_command_succeeds() {
        let ok = catalog_command(CatalogCmd {
            format: OutputFormat::Json,
        })
        .unwrap();
        assert!(ok);
    }
}
