//! Molecular docking using AutoDock Vina.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use oxidock_common::{OxidockError, Result};

/// One docking invocation: fixed receptor, one ligand, the engine's
/// search configuration, and the expected output files.
#[derive(Debug, Clone)]
pub struct DockingJob {
    pub receptor: PathBuf,
    pub ligand: PathBuf,
    pub config_file: PathBuf,
    pub out_pose: PathBuf,
    pub out_log: PathBuf,
}

impl DockingJob {
    /// Ligand identity, derived from the file stem.
    pub fn ligand_name(&self) -> String {
        self.ligand
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.ligand.to_string_lossy().into_owned())
    }
}

/// The external docking engine, behind a trait so the batch driver can
/// be exercised without a Vina binary.
#[async_trait]
pub trait DockingEngine: Send + Sync {
    async fn dock(&self, job: &DockingJob) -> Result<()>;
}

/// Wrapper for AutoDock Vina execution.
#[derive(Debug, Clone)]
pub struct VinaRunner {
    executable_path: PathBuf,
    cpus: u32,
    timeout: Duration,
}

impl VinaRunner {
    /// Create a new VinaRunner.
    pub fn new<P: AsRef<Path>>(executable_path: P, cpus: u32, timeout: Duration) -> Self {
        Self {
            executable_path: executable_path.as_ref().to_path_buf(),
            cpus,
            timeout,
        }
    }

    /// Probe the engine binary (`--version` exits 0 when installed).
    pub async fn is_available(&self) -> bool {
        Command::new(&self.executable_path)
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl DockingEngine for VinaRunner {
    /// Run one Vina invocation, capturing combined stdout/stderr into
    /// the per-ligand log file. A run past the wall-clock timeout is
    /// killed and reported as `OxidockError::Timeout`.
    async fn dock(&self, job: &DockingJob) -> Result<()> {
        let ligand_name = job.ligand_name();
        info!("Running AutoDock Vina on {:?}", job.ligand);

        let mut command = Command::new(&self.executable_path);
        command
            .arg("--receptor")
            .arg(&job.receptor)
            .arg("--ligand")
            .arg(&job.ligand)
            .arg("--config")
            .arg(&job.config_file)
            .arg("--out")
            .arg(&job.out_pose)
            .arg("--cpu")
            .arg(self.cpus.to_string())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result?,
            Err(_elapsed) => {
                return Err(OxidockError::Timeout {
                    ligand: ligand_name,
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        // The engine's transcript goes to the log whether it succeeded
        // or not; what happens to a failed run's log is up to the
        // failure router.
        let mut transcript = output.stdout;
        transcript.extend_from_slice(&output.stderr);
        tokio::fs::write(&job.out_log, &transcript).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OxidockError::Engine {
                ligand: ligand_name,
                detail: format!("exit status {}: {}", output.status, stderr.trim()),
            });
        }

        debug!("Vina completed for {}. Pose in {:?}", ligand_name, job.out_pose);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ligand_name_from_stem() {
        let job = DockingJob {
            receptor: PathBuf::from("/data/3X1J.pdbqt"),
            ligand: PathBuf::from("/data/ligands/mol_DB00123.pdbqt"),
            config_file: PathBuf::from("/data/conf.txt"),
            out_pose: PathBuf::from("/out/mol_DB00123_out.pdbqt"),
            out_log: PathBuf::from("/out/mol_DB00123_log.txt"),
        };
        assert_eq!(job.ligand_name(), "mol_DB00123");
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_available() {
        let runner = VinaRunner::new("/nonexistent/vina-binary", 1, Duration::from_secs(1));
        assert!(!runner.is_available().await);
    }
}
