//! oxidock-results — Turns a directory of per-ligand engine logs into
//! a ranked binding-affinity table.

pub mod parse;
pub mod table;

pub use parse::{best_affinity, library_id, ligand_name_from_log};
pub use table::{
    aggregate, collect_results, rank_results, write_ranked_csv, DockingResult, RankedResult,
};

pub type Result<T> = anyhow::Result<T>;
