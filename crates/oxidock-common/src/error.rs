use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OxidockError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("docking engine failed for {ligand}: {detail}")]
    Engine { ligand: String, detail: String },

    #[error("timeout ({seconds}s) exceeded for {ligand}")]
    Timeout { ligand: String, seconds: u64 },

    #[error("structure preparation failed for {path:?}: {detail}")]
    Prepare { path: PathBuf, detail: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, OxidockError>;
