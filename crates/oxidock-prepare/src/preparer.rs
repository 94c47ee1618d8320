//! Structure preparation via Open Babel.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use oxidock_common::fsops::move_into_dir;
use oxidock_common::{OxidockError, PrepareConfig, Result};

/// Counts for a finished preparation batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrepareSummary {
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
    pub failed_inputs: Vec<String>,
}

/// Wrapper for Open Babel execution.
pub struct StructurePreparer {
    converter_path: PathBuf,
    forcefield: String,
    input_extension: String,
}

impl StructurePreparer {
    /// Create a new StructurePreparer.
    pub fn new(config: &PrepareConfig) -> Self {
        Self {
            converter_path: config.converter_path.clone(),
            forcefield: config.forcefield.clone(),
            input_extension: config.input_extension.clone(),
        }
    }

    /// Probe the converter binary (`-V` exits 0 when installed).
    pub async fn is_available(&self) -> bool {
        Command::new(&self.converter_path)
            .arg("-V")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    async fn run_converter(&self, input: &Path, args: &[&OsStr]) -> Result<std::process::Output> {
        let output = Command::new(&self.converter_path)
            .args(args)
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OxidockError::Prepare {
                path: input.to_path_buf(),
                detail: format!("exit status {}: {}", output.status, stderr.trim()),
            });
        }
        Ok(output)
    }

    /// Convert one molecule file into `<stem>.pdbqt` in the output
    /// directory. Embedding/minimization failure is fatal for the
    /// item; non-convergence is a warning only.
    pub async fn prepare_file(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| OxidockError::Prepare {
                path: input.to_path_buf(),
                detail: "input has no usable filename".to_string(),
            })?;

        // Stage 1: hydrogens, 3D embedding, force-field minimization
        // into an intermediate PDB.
        let temp_pdb = tempfile::Builder::new()
            .prefix("oxidock-prep-")
            .suffix(".pdb")
            .tempfile_in(output_dir)?;
        let embed_output = self
            .run_converter(
                input,
                &[
                    input.as_os_str(),
                    OsStr::new("-O"),
                    temp_pdb.path().as_os_str(),
                    OsStr::new("--gen3d"),
                    OsStr::new("-h"),
                    OsStr::new("--minimize"),
                    OsStr::new("--ff"),
                    OsStr::new(&self.forcefield),
                ],
            )
            .await?;
        let diagnostics = String::from_utf8_lossy(&embed_output.stderr);
        if diagnostics.to_lowercase().contains("converge") {
            warn!("Minimization did not converge for {:?}", input);
        }

        // Stage 2: conversion with Gasteiger partial charges.
        let output_pdbqt = output_dir.join(format!("{stem}.pdbqt"));
        self.run_converter(
            input,
            &[
                temp_pdb.path().as_os_str(),
                OsStr::new("-O"),
                output_pdbqt.as_os_str(),
                OsStr::new("-xh"),
                OsStr::new("--partialcharge"),
                OsStr::new("gasteiger"),
            ],
        )
        .await?;

        if !output_pdbqt.exists() {
            return Err(OxidockError::Prepare {
                path: input.to_path_buf(),
                detail: "converter produced no output file".to_string(),
            });
        }

        debug!("Prepared {:?} -> {:?}", input, output_pdbqt);
        Ok(output_pdbqt)
    }

    /// Convert every matching file in a directory. A faulty input is
    /// moved (not copied) into the faulty directory; no retry.
    pub async fn prepare_batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        faulty_dir: &Path,
    ) -> Result<PrepareSummary> {
        std::fs::create_dir_all(output_dir)?;
        std::fs::create_dir_all(faulty_dir)?;

        let mut inputs: Vec<PathBuf> = std::fs::read_dir(input_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .map(|ext| ext.eq_ignore_ascii_case(&self.input_extension))
                        .unwrap_or(false)
            })
            .collect();
        inputs.sort();

        let mut summary = PrepareSummary {
            total: inputs.len(),
            ..PrepareSummary::default()
        };

        for (idx, input) in inputs.iter().enumerate() {
            info!("Processing {}/{}: {:?}", idx + 1, summary.total, input);
            match self.prepare_file(input, output_dir).await {
                Ok(output) => {
                    info!("Success: {:?} -> {:?}", input, output);
                    summary.converted += 1;
                }
                Err(e) => {
                    error!("Error processing {:?}: {e}", input);
                    match move_into_dir(input, faulty_dir) {
                        Ok(dest) => info!("Moved faulty file to {:?}", dest),
                        Err(move_err) => {
                            warn!("Could not move {:?} to faulty dir: {move_err}", input)
                        }
                    }
                    summary.failed += 1;
                    summary
                        .failed_inputs
                        .push(input.to_string_lossy().into_owned());
                }
            }
        }

        info!(
            "Preparation finished: {} converted, {} faulty (of {})",
            summary.converted, summary.failed, summary.total
        );
        Ok(summary)
    }
}
