//! Resumability: deciding whether a ligand has already been processed.
//!
//! There is no state store — completion is defined by the existence of
//! the expected output files. The trait exists so the driver can be
//! tested against an in-memory store.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use oxidock_common::SkipPolicy;

/// Answers "has this ligand already been completed?".
pub trait CompletionStore: Send + Sync {
    fn is_complete(&self, ligand_name: &str) -> bool;
}

/// Filesystem-backed store: a ligand is complete when its expected
/// pose / log files exist in the output directory, per the configured
/// skip policy.
pub struct FsCompletionStore {
    output_dir: PathBuf,
    policy: SkipPolicy,
}

impl FsCompletionStore {
    pub fn new(output_dir: PathBuf, policy: SkipPolicy) -> Self {
        Self { output_dir, policy }
    }

    fn pose_path(&self, ligand_name: &str) -> PathBuf {
        self.output_dir.join(format!("{ligand_name}_out.pdbqt"))
    }

    fn log_path(&self, ligand_name: &str) -> PathBuf {
        self.output_dir.join(format!("{ligand_name}_log.txt"))
    }
}

impl CompletionStore for FsCompletionStore {
    fn is_complete(&self, ligand_name: &str) -> bool {
        let pose = self.pose_path(ligand_name).exists();
        let log = self.log_path(ligand_name).exists();
        match self.policy {
            SkipPolicy::BothOutputs => pose && log,
            SkipPolicy::EitherOutput => pose || log,
        }
    }
}

/// In-memory store for unit tests.
pub struct MemoryCompletionStore {
    done: Mutex<HashSet<String>>,
}

impl MemoryCompletionStore {
    pub fn new() -> Self {
        Self {
            done: Mutex::new(HashSet::new()),
        }
    }

    /// Pre-mark a ligand as completed.
    pub fn with(self, ligand_name: &str) -> Self {
        self.done.lock().unwrap().insert(ligand_name.to_string());
        self
    }
}

impl Default for MemoryCompletionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionStore for MemoryCompletionStore {
    fn is_complete(&self, ligand_name: &str) -> bool {
        self.done.lock().unwrap().contains(ligand_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_outputs_policy_needs_pose_and_log() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lig_DB1_out.pdbqt"), "pose").unwrap();

        let store = FsCompletionStore::new(dir.path().to_path_buf(), SkipPolicy::BothOutputs);
        assert!(!store.is_complete("lig_DB1"));

        std::fs::write(dir.path().join("lig_DB1_log.txt"), "log").unwrap();
        assert!(store.is_complete("lig_DB1"));
    }

    #[test]
    fn test_either_output_policy_accepts_one_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lig_DB2_log.txt"), "log").unwrap();

        let store = FsCompletionStore::new(dir.path().to_path_buf(), SkipPolicy::EitherOutput);
        assert!(store.is_complete("lig_DB2"));
        assert!(!store.is_complete("lig_DB3"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCompletionStore::new().with("done_ligand");
        assert!(store.is_complete("done_ligand"));
        assert!(!store.is_complete("pending_ligand"));
    }
}
