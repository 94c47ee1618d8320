//! oxidock-screen — Parallel batch-docking driver.
//!
//! Takes a directory of docking-ready ligands and drives the external
//! docking engine across them:
//! 1. Discover ligand files (sorted, by extension)
//! 2. Skip ligands whose outputs already exist (resumable runs)
//! 3. Dispatch the rest to a bounded worker pool with per-task timeouts
//! 4. Route failures to cleanup or quarantine, never aborting the batch
//! 5. Report a tagged summary once every task has finished

pub mod driver;
pub mod engine;
pub mod failures;
pub mod ligand;
pub mod store;

pub use driver::{BatchDriver, BatchSummary, TaskOutcome};
pub use engine::{DockingEngine, DockingJob, VinaRunner};
pub use ligand::{discover_ligands, LigandRecord, LigandStatus};
pub use store::{CompletionStore, FsCompletionStore, MemoryCompletionStore};
