//! oxidock — Virtual-screening pipeline around AutoDock Vina.
//! Entry point for the oxidock binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use oxidock_common::PipelineConfig;
use oxidock_prepare::StructurePreparer;
use oxidock_screen::{BatchDriver, BatchSummary, VinaRunner};

#[derive(Parser)]
#[command(
    name = "oxidock",
    version,
    about = "Batch molecular docking: prepare ligands, drive the engine, rank results"
)]
struct Cli {
    /// Path to oxidock.toml (defaults to OXIDOCK_CONFIG, then ./oxidock.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Convert raw molecule files (SDF) into docking-ready PDBQT.
    Prepare {
        /// Directory of raw input structures.
        #[arg(long)]
        input_dir: PathBuf,
    },
    /// Dock every ligand in the configured library.
    Dock,
    /// Aggregate per-ligand engine logs into a ranked CSV.
    Rank,
    /// Dock, then aggregate — the full screening flow.
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("oxidock=debug,info")),
        )
        .init();

    let cli = Cli::parse();
    info!("oxidock starting up (version {})", env!("CARGO_PKG_VERSION"));

    let config = match PipelineConfig::load(cli.config.as_deref()) {
        Ok(c) => {
            info!(
                "Configuration loaded. Receptor: {:?}, ligand dir: {:?}",
                c.paths.receptor, c.paths.ligand_dir
            );
            c
        }
        Err(e) => {
            warn!("Could not load oxidock.toml: {e}");
            warn!("Copy oxidock.example.toml to oxidock.toml and edit it.");
            return Ok(());
        }
    };

    std::fs::create_dir_all(&config.paths.output_dir)?;
    std::fs::create_dir_all(&config.paths.faulty_dir)?;

    match cli.command {
        CliCommand::Prepare { input_dir } => {
            prepare(&config, &input_dir).await?;
        }
        CliCommand::Dock => {
            dock(&config).await?;
        }
        CliCommand::Rank => {
            rank(&config)?;
        }
        CliCommand::Run => {
            dock(&config).await?;
            rank(&config)?;
        }
    }

    Ok(())
}

async fn prepare(config: &PipelineConfig, input_dir: &PathBuf) -> anyhow::Result<()> {
    let preparer = StructurePreparer::new(&config.prepare);
    if !preparer.is_available().await {
        anyhow::bail!(
            "Open Babel not found at {:?}; install it or set [prepare].converter_path",
            config.prepare.converter_path
        );
    }

    let summary = preparer
        .prepare_batch(input_dir, &config.paths.ligand_dir, &config.paths.faulty_dir)
        .await?;
    info!(
        "Prepared {} of {} structure(s); {} moved to {:?}",
        summary.converted, summary.total, summary.failed, config.paths.faulty_dir
    );
    Ok(())
}

async fn dock(config: &PipelineConfig) -> anyhow::Result<BatchSummary> {
    let probe = VinaRunner::new(
        &config.engine.path,
        config.engine.cpus,
        Duration::from_secs(config.driver.timeout_seconds),
    );
    if !probe.is_available().await {
        anyhow::bail!(
            "docking engine not found at {:?}; install AutoDock Vina or set [engine].path",
            config.engine.path
        );
    }

    let driver = BatchDriver::new(config)?;
    let summary = driver.run().await?;
    if summary.failed > 0 {
        warn!(
            "{} ligand(s) failed; faulty inputs are under {:?}",
            summary.failed, config.paths.faulty_dir
        );
    }
    Ok(summary)
}

fn rank(config: &PipelineConfig) -> anyhow::Result<()> {
    let (csv_path, ranked) =
        oxidock_results::aggregate(&config.paths.output_dir, &config.results)?;
    info!("Results have been saved to {:?} ({ranked} ligand(s) ranked)", csv_path);
    Ok(())
}
