//! Ligand discovery and per-ligand records.

use std::path::{Path, PathBuf};

use oxidock_common::Result;

/// Processing state of a ligand across a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LigandStatus {
    Pending,
    Done,
    Faulty,
}

/// One ligand file scheduled for docking. Identity is the file stem;
/// the record is created at discovery time and updated as its task
/// completes.
#[derive(Debug, Clone)]
pub struct LigandRecord {
    pub name: String,
    pub path: PathBuf,
    pub status: LigandStatus,
}

impl LigandRecord {
    /// Build a record from a file path. Returns None for paths without
    /// a usable UTF-8 file stem.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_stem()?.to_str()?.to_string();
        Some(Self {
            name,
            path,
            status: LigandStatus::Pending,
        })
    }
}

/// List ligand files in a directory by extension, sorted by filename so
/// every run visits them in the same order.
pub fn discover_ligands(dir: &Path, extension: &str) -> Result<Vec<LigandRecord>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case(extension))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    Ok(paths.into_iter().filter_map(LigandRecord::from_path).collect())
}
