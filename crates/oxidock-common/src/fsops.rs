//! Filesystem helpers shared by the preparer and the batch driver.

use std::path::{Path, PathBuf};

use crate::error::{OxidockError, Result};

/// Move a file into a directory, keeping its filename. Falls back to
/// copy-and-remove when rename crosses a filesystem boundary.
pub fn move_into_dir(file: &Path, dir: &Path) -> Result<PathBuf> {
    let dest = dir.join(file_name(file)?);
    match std::fs::rename(file, &dest) {
        Ok(()) => Ok(dest),
        Err(_) => {
            std::fs::copy(file, &dest)?;
            std::fs::remove_file(file)?;
            Ok(dest)
        }
    }
}

/// Copy a file into a directory, keeping its filename. The original is
/// left in place.
pub fn copy_into_dir(file: &Path, dir: &Path) -> Result<PathBuf> {
    let dest = dir.join(file_name(file)?);
    std::fs::copy(file, &dest)?;
    Ok(dest)
}

/// Remove a file if it exists; missing files are not an error.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr> {
    path.file_name()
        .ok_or_else(|| OxidockError::Config(format!("path has no filename: {}", path.display())))
}
