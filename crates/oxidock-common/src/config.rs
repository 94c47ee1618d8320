//! Configuration loading for oxidock.
//! Reads oxidock.toml from the current directory or the path in the
//! OXIDOCK_CONFIG env var, with an explicit path taking precedence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{OxidockError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub prepare: PrepareConfig,
    #[serde(default)]
    pub results: ResultsConfig,
}

/// Filesystem layout for a screening run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Prepared receptor structure (PDBQT).
    pub receptor: PathBuf,
    /// Directory of docking-ready ligand files.
    pub ligand_dir: PathBuf,
    /// Docking engine configuration file (search box etc.).
    pub config_file: PathBuf,
    /// Directory receiving per-ligand poses and logs.
    pub output_dir: PathBuf,
    /// Directory receiving faulty / quarantined ligands.
    pub faulty_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_path")]
    pub path: PathBuf,
    /// CPU threads granted to each engine invocation. Kept at 1 so the
    /// worker pool controls overall parallelism.
    #[serde(default = "default_engine_cpus")]
    pub cpus: u32,
}

fn default_engine_path() -> PathBuf { PathBuf::from("vina") }
fn default_engine_cpus() -> u32 { 1 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            cpus: default_engine_cpus(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default)]
    pub skip_policy: SkipPolicy,
    #[serde(default)]
    pub failure_mode: FailureMode,
    #[serde(default = "default_ligand_extension")]
    pub ligand_extension: String,
}

fn default_timeout_seconds() -> u64 { 500 }
fn default_max_workers()    -> usize { 64 }
fn default_ligand_extension() -> String { "pdbqt".to_string() }

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_workers: default_max_workers(),
            skip_policy: SkipPolicy::default(),
            failure_mode: FailureMode::default(),
            ligand_extension: default_ligand_extension(),
        }
    }
}

/// Which output files must already exist for a ligand to be skipped as
/// complete. The deployed driver variants disagreed on this, so it is
/// configurable rather than fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    /// Both the pose file and the log file must exist.
    #[default]
    BothOutputs,
    /// Either file alone counts as complete.
    EitherOutput,
}

/// What to do with a ligand whose docking invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Remove partial outputs and move the ligand to the faulty
    /// directory (workstation runs).
    CleanUp,
    /// Record the failure in the error log and copy the ligand to the
    /// faulty directory, leaving the original for manual retry (HPC
    /// runs).
    #[default]
    Quarantine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    #[serde(default = "default_converter_path")]
    pub converter_path: PathBuf,
    #[serde(default = "default_forcefield")]
    pub forcefield: String,
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
}

fn default_converter_path() -> PathBuf { PathBuf::from("obabel") }
fn default_forcefield()     -> String  { "UFF".to_string() }
fn default_input_extension() -> String { "sdf".to_string() }

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            converter_path: default_converter_path(),
            forcefield: default_forcefield(),
            input_extension: default_input_extension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// Label for the identifier column of the ranked CSV.
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Which underscore-separated token of the ligand name carries the
    /// library identifier (falls back to the full name when absent).
    #[serde(default = "default_id_token")]
    pub id_token: usize,
    #[serde(default = "default_results_file")]
    pub output_file: String,
}

fn default_id_column()    -> String { "Ligand ID".to_string() }
fn default_id_token()     -> usize  { 1 }
fn default_results_file() -> String { "docking_results.csv".to_string() }

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            id_token: default_id_token(),
            output_file: default_results_file(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from an explicit path, OXIDOCK_CONFIG, or
    /// ./oxidock.toml, in that order.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::var("OXIDOCK_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("oxidock.toml")),
        };
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| OxidockError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: PipelineConfig = toml::from_str(&raw)
            .map_err(|e| OxidockError::Config(format!("cannot parse {}: {e}", path.display())))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hpc_deployment() {
        let driver = DriverConfig::default();
        assert_eq!(driver.timeout_seconds, 500);
        assert_eq!(driver.max_workers, 64);
        assert_eq!(driver.skip_policy, SkipPolicy::BothOutputs);
        assert_eq!(driver.failure_mode, FailureMode::Quarantine);
    }

    #[test]
    fn test_minimal_toml_only_needs_paths() {
        let raw = r#"
            [paths]
            receptor = "/data/3X1J.pdbqt"
            ligand_dir = "/data/ligands"
            config_file = "/data/vs_config.txt"
            output_dir = "/data/out"
            faulty_dir = "/data/faulty"
        "#;
        let config: PipelineConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.engine.path, PathBuf::from("vina"));
        assert_eq!(config.engine.cpus, 1);
        assert_eq!(config.results.id_column, "Ligand ID");
    }

    #[test]
    fn test_policy_strings_round_trip() {
        let raw = r#"
            [paths]
            receptor = "r.pdbqt"
            ligand_dir = "l"
            config_file = "c.txt"
            output_dir = "o"
            faulty_dir = "f"

            [driver]
            skip_policy = "either_output"
            failure_mode = "clean_up"
        "#;
        let config: PipelineConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.driver.skip_policy, SkipPolicy::EitherOutput);
        assert_eq!(config.driver.failure_mode, FailureMode::CleanUp);

        let serialized = toml::to_string(&config).unwrap();
        let back: PipelineConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(back.driver.skip_policy, SkipPolicy::EitherOutput);
        assert_eq!(back.driver.failure_mode, FailureMode::CleanUp);
    }
}
