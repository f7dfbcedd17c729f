//! Ocean profile preprocessor.
//!
//! Matches profile text files against daily SSH/SST maps and writes an
//! aligned dataset of profile keys, interpolated profiles and surface
//! windows.

mod config_loader;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use netcdf_parser::{default_reader, MapKind, MapReader};
use preprocessing::{write_dataset, write_summary, DatasetAssembler, MapCatalog, PreprocessConfig};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use config_loader::{load_config, parse_level, LoggingConfig, Overrides};

#[derive(Parser, Debug)]
#[command(name = "preprocessor")]
#[command(about = "Builds an aligned profile and surface-map dataset from ocean observations")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "PREPROCESS_CONFIG", default_value = "config/preprocess.yaml")]
    config: PathBuf,

    /// Log level (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: json or pretty (overrides the config file)
    #[arg(long)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process every profile file and write the dataset
    Run {
        /// Worker threads (0 = one per core)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Output directory (default: data_storage/<timestamp>)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Process and report without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Index the map directories and print what was found
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut overrides = Overrides {
        log_level: args.log_level.clone(),
        log_format: args.log_format.clone(),
        ..Default::default()
    };
    if let Command::Run {
        workers,
        output_dir,
        ..
    } = &args.command
    {
        overrides.workers = *workers;
        overrides.output_dir = output_dir.clone();
    }

    let config = load_config(&args.config, &overrides)?;
    init_tracing(&config.logging)?;

    info!(config = %args.config.display(), "Loaded configuration");

    match args.command {
        Command::Run { dry_run, .. } => run(config.run, dry_run).await,
        Command::Catalog => catalog(&config.run),
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(parse_level(&logging.level))
        .with_target(true)
        .with_thread_ids(true);

    if logging.format == "pretty" {
        tracing::subscriber::set_global_default(builder.pretty().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    }
    Ok(())
}

async fn run(config: PreprocessConfig, dry_run: bool) -> Result<()> {
    let output_dir = config.resolve_output_dir(Local::now().naive_local());
    let reader: Arc<dyn MapReader> = Arc::from(default_reader(config.variables.clone()));

    info!(
        profiles = %config.inputs.profile_dir.display(),
        ssh = %config.inputs.ssh_dir.display(),
        sst = %config.inputs.sst_dir.display(),
        period_min = %config.selection.period.min,
        period_max = %config.selection.period.max,
        "Starting preprocessing run"
    );

    // Parsing and interpolation are CPU bound; keep them off the runtime
    let (dataset, summary, config) = tokio::task::spawn_blocking(move || -> Result<_> {
        let assembler = DatasetAssembler::new(config, reader)?;
        let (dataset, summary) = assembler.run()?;
        Ok((dataset, summary, assembler.config().clone()))
    })
    .await
    .context("Preprocessing task failed")??;

    if dataset.is_empty() {
        warn!("No profile passed every check; the dataset is empty");
    }

    if dry_run {
        info!(
            profiles = dataset.len(),
            accepted = summary.accepted(),
            rejected = summary.rejected(),
            "Dry run, nothing written"
        );
        return Ok(());
    }

    let manifest = write_dataset(&output_dir, &dataset, &config)
        .with_context(|| format!("Failed to write dataset to {}", output_dir.display()))?;
    write_summary(&output_dir, &summary)
        .with_context(|| format!("Failed to write summary to {}", output_dir.display()))?;

    info!(
        output_dir = %output_dir.display(),
        profiles = manifest.profiles,
        failed_files = summary.failed_files().count(),
        "Preprocessing complete"
    );
    Ok(())
}

fn catalog(config: &PreprocessConfig) -> Result<()> {
    config.validate()?;

    for (kind, dir) in [
        (MapKind::Ssh, &config.inputs.ssh_dir),
        (MapKind::Sst, &config.inputs.sst_dir),
    ] {
        let catalog = MapCatalog::scan(dir, kind)?;
        let in_period = catalog
            .dates()
            .filter(|d| config.selection.period.contains(*d))
            .count();

        match catalog.date_range() {
            Some((first, last)) => println!(
                "{}: {} files in {} ({} .. {}), {} inside the period",
                kind,
                catalog.len(),
                dir.display(),
                first,
                last,
                in_period
            ),
            None => println!("{}: no map files in {}", kind, dir.display()),
        }
    }
    Ok(())
}
