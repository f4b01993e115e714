//! pokedata CLI - converts downloaded game sheets into app JSON
//!
//! Reads `PDATA.csv`, `MDATA.csv`, `IDATA.csv` and `TDATA.csv` from a data
//! folder, merges the overrides under `<assets>/extra` and writes the JSON
//! tree to the output folder.

use clap::Parser;
use pokedata::config::DEFAULT_CONFIG_FILE;
use pokedata::{convert_all, ConverterConfig, DatasetOutcome, OverrideStore};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pokedata")]
#[command(version, about = "Convert downloaded game sheets into app JSON", long_about = None)]
struct Cli {
    /// Folder with the downloaded sheets
    data: Option<PathBuf>,

    /// Custom output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep variant rows as separate records
    #[arg(long)]
    no_variants: bool,

    /// Folder holding extra/*.json overrides
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Config file (default: pokedata.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    }
}

/// Load config, apply CLI overrides and convert. `Ok(false)` when a sheet failed.
fn run(cli: Cli) -> pokedata::Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;

    // CLI flags win over the config file
    if let Some(data) = cli.data {
        config.paths.data = data;
    }
    if let Some(output) = cli.output {
        config.paths.output = output;
    }
    if let Some(assets) = cli.assets {
        config.paths.assets = assets;
    }
    if cli.no_variants {
        config.variants = false;
    }

    let overrides = OverrideStore::load(&config.paths.assets)?;
    let summary = convert_all(&config.paths.data, &config, &overrides)?;

    for report in &summary.reports {
        match &report.outcome {
            DatasetOutcome::Converted(count) => {
                tracing::info!("{}: {} records", report.sheet, count)
            }
            DatasetOutcome::Failed(reason) => {
                tracing::error!("{}: failed ({})", report.sheet, reason)
            }
        }
    }
    tracing::info!("Output written to {}", config.paths.output.display());

    Ok(!summary.has_failures())
}

fn load_config(path: Option<&Path>) -> pokedata::Result<ConverterConfig> {
    match path {
        Some(path) => ConverterConfig::load_from_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => ConverterConfig::load_from_file(DEFAULT_CONFIG_FILE),
        None => Ok(ConverterConfig::default()),
    }
}
