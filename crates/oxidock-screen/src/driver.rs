//! Bounded concurrent dispatch of docking tasks.
//!
//! Each ligand is an independent unit of work: a failure, timeout, or
//! panic in one task never aborts the batch. Coordination happens only
//! through the filesystem (output existence) and the collection point
//! that awaits every spawned task before the summary is produced.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use oxidock_common::fsops::{move_into_dir, remove_if_exists};
use oxidock_common::{DriverConfig, FailureMode, OxidockError, PathsConfig, PipelineConfig, Result};

use crate::engine::{DockingEngine, DockingJob, VinaRunner};
use crate::failures::ErrorLog;
use crate::ligand::discover_ligands;
use crate::store::{CompletionStore, FsCompletionStore};

/// Tagged result of one ligand's task, collected after every task has
/// finished.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed { ligand: String },
    Skipped { ligand: String },
    Failed { ligand: String, error: String },
}

/// Counts for a finished batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failed_ligands: Vec<String>,
}

/// Routes a failed task's ligand according to the configured mode.
struct FailureRouter {
    mode: FailureMode,
    faulty_dir: PathBuf,
    error_log: Option<Arc<ErrorLog>>,
}

impl FailureRouter {
    /// Best effort: routing problems are logged, never propagated, so
    /// the batch keeps going.
    fn route(&self, job: &DockingJob, cause: &OxidockError) {
        let ligand_name = job.ligand_name();
        match self.mode {
            FailureMode::CleanUp => {
                for partial in [&job.out_pose, &job.out_log] {
                    if let Err(e) = remove_if_exists(partial) {
                        warn!("Could not remove partial output {:?}: {e}", partial);
                    }
                }
                match move_into_dir(&job.ligand, &self.faulty_dir) {
                    Ok(dest) => info!("Moved faulty structure to {:?}", dest),
                    Err(e) => warn!("Could not move {:?} to faulty dir: {e}", job.ligand),
                }
            }
            FailureMode::Quarantine => {
                if let Some(ref log) = self.error_log {
                    if let Err(e) = log.record(&ligand_name, &cause.to_string()) {
                        warn!("Could not append to error log: {e}");
                    }
                }
                match oxidock_common::fsops::copy_into_dir(&job.ligand, &self.faulty_dir) {
                    Ok(dest) => info!("Copied faulty ligand to {:?}", dest),
                    Err(e) => warn!("Could not copy {:?} to quarantine: {e}", job.ligand),
                }
            }
        }
    }
}

/// Drives a whole ligand library through the docking engine.
pub struct BatchDriver {
    paths: PathsConfig,
    driver: DriverConfig,
    engine: Arc<dyn DockingEngine>,
    store: Arc<dyn CompletionStore>,
    error_log: Option<Arc<ErrorLog>>,
}

impl BatchDriver {
    /// Build a driver from pipeline configuration, wiring the Vina
    /// runner and the filesystem completion store.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let engine: Arc<dyn DockingEngine> = Arc::new(VinaRunner::new(
            &config.engine.path,
            config.engine.cpus,
            Duration::from_secs(config.driver.timeout_seconds),
        ));
        let store: Arc<dyn CompletionStore> = Arc::new(FsCompletionStore::new(
            config.paths.output_dir.clone(),
            config.driver.skip_policy,
        ));
        let error_log = match config.driver.failure_mode {
            FailureMode::Quarantine => {
                std::fs::create_dir_all(&config.paths.output_dir)?;
                Some(Arc::new(ErrorLog::open(
                    config.paths.output_dir.join("vina_error_log.csv"),
                )?))
            }
            FailureMode::CleanUp => None,
        };
        Ok(Self {
            paths: config.paths.clone(),
            driver: config.driver.clone(),
            engine,
            store,
            error_log,
        })
    }

    /// Assemble a driver from explicit parts. Test seam: substitutes a
    /// stub engine or an in-memory completion store.
    pub fn with_parts(
        paths: PathsConfig,
        driver: DriverConfig,
        engine: Arc<dyn DockingEngine>,
        store: Arc<dyn CompletionStore>,
        error_log: Option<Arc<ErrorLog>>,
    ) -> Self {
        Self {
            paths,
            driver,
            engine,
            store,
            error_log,
        }
    }

    fn worker_count(&self) -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        cpus.min(self.driver.max_workers).max(1)
    }

    /// Run the batch: discover, dispatch, await everything, summarize.
    pub async fn run(&self) -> Result<BatchSummary> {
        std::fs::create_dir_all(&self.paths.output_dir)?;
        std::fs::create_dir_all(&self.paths.faulty_dir)?;

        let ligands = discover_ligands(&self.paths.ligand_dir, &self.driver.ligand_extension)?;
        let total = ligands.len();
        let workers = self.worker_count();
        info!(
            "Discovered {} ligand(s) in {:?}; dispatching across {} worker(s)",
            total, self.paths.ligand_dir, workers
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut handles = Vec::with_capacity(total);

        for (idx, ligand) in ligands.into_iter().enumerate() {
            let job = DockingJob {
                receptor: self.paths.receptor.clone(),
                ligand: ligand.path.clone(),
                config_file: self.paths.config_file.clone(),
                out_pose: self
                    .paths
                    .output_dir
                    .join(format!("{}_out.pdbqt", ligand.name)),
                out_log: self
                    .paths
                    .output_dir
                    .join(format!("{}_log.txt", ligand.name)),
            };
            let router = FailureRouter {
                mode: self.driver.failure_mode,
                faulty_dir: self.paths.faulty_dir.clone(),
                error_log: self.error_log.clone(),
            };
            let engine = Arc::clone(&self.engine);
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            let name = ligand.name.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("worker semaphore closed");

                if store.is_complete(&name) {
                    info!("Skipping {}: {}/{} (already processed)", name, idx + 1, total);
                    return TaskOutcome::Skipped { ligand: name };
                }

                info!("Processing {}: {}/{}", name, idx + 1, total);
                match engine.dock(&job).await {
                    Ok(()) => TaskOutcome::Completed { ligand: name },
                    Err(cause) => {
                        warn!("Docking failed for {}: {cause}", name);
                        router.route(&job, &cause);
                        TaskOutcome::Failed {
                            ligand: name,
                            error: cause.to_string(),
                        }
                    }
                }
            }));
        }

        // Collection point: every task runs to completion or failure
        // before aggregation; panics are logged, not re-raised.
        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };
        for handle in handles {
            match handle.await {
                Ok(TaskOutcome::Completed { .. }) => summary.completed += 1,
                Ok(TaskOutcome::Skipped { .. }) => summary.skipped += 1,
                Ok(TaskOutcome::Failed { ligand, .. }) => {
                    summary.failed += 1;
                    summary.failed_ligands.push(ligand);
                }
                Err(join_error) => {
                    error!("Docking task aborted: {join_error}");
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Batch finished: {} completed, {} skipped, {} failed (of {})",
            summary.completed, summary.skipped, summary.failed, summary.total
        );
        Ok(summary)
    }
}
