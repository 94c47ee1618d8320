//! Durable failure records for quarantine-mode runs.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use oxidock_common::Result;

/// Append-only CSV of docking failures (`Timestamp, Ligand, Error`).
/// Rows are only ever added; the header is written once when the file
/// is first created. Appends from concurrent tasks are serialized
/// through an in-process lock.
pub struct ErrorLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ErrorLog {
    /// Open the error log, creating it with a header row if missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(["Timestamp", "Ligand", "Error"])?;
            writer.flush()?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Append one failure row with the current timestamp.
    pub fn record(&self, ligand_name: &str, error: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record([
            chrono::Local::now().to_rfc3339().as_str(),
            ligand_name,
            error,
        ])?;
        writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
