//! Lendscope report CLI
//!
//! Loads a loan-application dataset and prints the portfolio risk report
//! as JSON on stdout. Logs go to stderr so the report stays pipeable.
//!
//! # Usage
//! ```sh
//! DATA_PATH=data/applications.csv cargo run -- --pretty
//! ```
//!
//! # Environment Variables
//! - `DATA_PATH` - Dataset CSV path (default: data/applications.csv)
//! - `EMPLOYMENT_BUCKET_YEARS` - Bucket edges, comma-separated (default: 0,1,3,5,10,20)
//! - `LTI_THRESHOLD` / `DTI_THRESHOLD` - Affordability split thresholds
//! - `HIGH_CREDIT_THRESHOLD` - Credit amount counted as a large loan

use anyhow::Result;
use clap::Parser;
use lendscope::application::report::PortfolioReport;
use lendscope::config::AnalysisConfig;
use lendscope::domain::ports::ApplicationSource;
use lendscope::infrastructure::csv_loader::CsvApplicationLoader;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the application dataset CSV (overrides DATA_PATH)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    info!("Lendscope {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = AnalysisConfig::from_env()?;
    if let Some(input) = args.input {
        config.data_path = input;
    }
    info!(
        "Configuration loaded: data={}, buckets={:?}",
        config.data_path.display(),
        config.employment_bucket_years
    );

    let loader = CsvApplicationLoader::new(&config.data_path);
    let records = loader.load_applications()?;

    let report = PortfolioReport::build(&records, &config)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
