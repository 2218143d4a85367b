//! research-runner: run one research pass over a quote batch.
//!
//! Reads a quote batch (JSON) from `--input` or stdin, loads whatever
//! reference catalogs are configured, and prints the analysis result as JSON
//! on stdout. Logs go to stderr.
//!
//! Usage:
//!   research-runner --input quotes.json --pretty
//!   cat quotes.json | RESEARCH_POSITIONS_PATH=positions.json research-runner

use analysis_core::QuoteBatch;
use analysis_orchestrator::ResearchAggregator;
use anyhow::{Context, Result};
use std::io::Read;

mod catalogs;
mod config;

use catalogs::Catalogs;
use config::RunnerConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let pretty = args.iter().any(|a| a == "--pretty");
    let input = input_path(&args)?;

    let config = RunnerConfig::from_env()?;
    tracing::info!(
        "research-runner: input={}, as_of={:?}, parallel={}",
        input.unwrap_or("<stdin>"),
        config.as_of,
        config.parallel
    );

    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read quote batch from {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read quote batch from stdin")?;
            buf
        }
    };
    let batch: QuoteBatch = serde_json::from_str(&raw).context("Failed to parse quote batch")?;

    for failure in &batch.errors {
        tracing::warn!("{}: quote fetch failed upstream: {}", failure.ticker, failure.error);
    }

    let catalogs = Catalogs::load(&config)?;
    let mut refs = catalogs.reference_data();
    if let Some(as_of) = config.as_of {
        refs = refs.as_of(as_of);
    }

    let result = ResearchAggregator::new()
        .with_parallel(config.parallel)
        .research(&batch, &refs);

    let output = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);

    Ok(())
}

/// Value of `--input`, or `None` to read stdin
fn input_path(args: &[String]) -> Result<Option<&str>> {
    match args.iter().position(|a| a == "--input") {
        Some(i) => match args.get(i + 1).filter(|v| !v.starts_with("--")) {
            Some(path) => Ok(Some(path.as_str())),
            None => anyhow::bail!("--input requires a path"),
        },
        None => Ok(None),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("research_runner=info,analysis_orchestrator=info")
    });

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  research-runner [--input PATH] [--pretty]");
    eprintln!("");
    eprintln!("Options:");
    eprintln!("  --input PATH   Quote batch JSON (default: stdin)");
    eprintln!("  --pretty       Pretty-print the result");
    eprintln!("");
    eprintln!("Environment:");
    eprintln!("  RESEARCH_POSITIONS_PATH   Position catalog JSON");
    eprintln!("  RESEARCH_EARNINGS_PATH    Earnings calendar JSON");
    eprintln!("  RESEARCH_SENTIMENT_PATH   Scored sentiment JSON");
    eprintln!("  RESEARCH_HEADLINES_PATH   Headlines for keyword sentiment");
    eprintln!("  RESEARCH_HISTORY_PATH     Daily closes per ticker");
    eprintln!("  RESEARCH_AS_OF            Earnings reference date (YYYY-MM-DD)");
    eprintln!("  RESEARCH_PARALLEL         Analyze tickers in parallel (true/false)");
}
