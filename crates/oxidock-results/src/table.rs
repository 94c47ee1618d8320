//! Ranked-table construction and CSV output.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use oxidock_common::ResultsConfig;

use crate::parse::{best_affinity, library_id, ligand_name_from_log};
use crate::Result;

/// Best score extracted from one ligand's log. Immutable once parsed.
#[derive(Debug, Clone, Serialize)]
pub struct DockingResult {
    pub ligand_id: String,
    pub affinity: f64,
    pub log_path: PathBuf,
}

/// A docking result with its 1-based position in the ranked table.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    pub ligand_id: String,
    pub affinity: f64,
}

/// Collect results from every `*_log.txt` in the output directory.
/// Logs without a rank-1 row are excluded without error; unreadable
/// logs are warned about and skipped.
pub fn collect_results(output_dir: &Path, id_token: usize) -> Result<Vec<DockingResult>> {
    let mut results = Vec::new();
    let mut logs: Vec<PathBuf> = std::fs::read_dir(output_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with("_log.txt"))
                .unwrap_or(false)
        })
        .collect();
    logs.sort();

    for log_path in logs {
        let affinity = match best_affinity(&log_path) {
            Ok(Some(a)) => a,
            Ok(None) => {
                debug!("No rank-1 pose in {:?}; excluding", log_path);
                continue;
            }
            Err(e) => {
                warn!("Could not read {:?}: {e}", log_path);
                continue;
            }
        };
        let ligand_name = match ligand_name_from_log(&log_path) {
            Some(name) => name,
            None => continue,
        };
        results.push(DockingResult {
            ligand_id: library_id(&ligand_name, id_token),
            affinity,
            log_path,
        });
    }
    Ok(results)
}

/// Sort ascending by affinity (best first) and assign 1-based ranks.
/// The sort is stable, so ties keep their collection order.
pub fn rank_results(mut results: Vec<DockingResult>) -> Vec<RankedResult> {
    results.sort_by(|a, b| {
        a.affinity
            .partial_cmp(&b.affinity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
        .into_iter()
        .enumerate()
        .map(|(idx, r)| RankedResult {
            rank: idx + 1,
            ligand_id: r.ligand_id,
            affinity: r.affinity,
        })
        .collect()
}

/// Write the ranked table. Always writes the header, so an empty run
/// still produces a valid header-only CSV.
pub fn write_ranked_csv(ranked: &[RankedResult], path: &Path, id_column: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Rank", id_column, "Binding Affinity (kcal/mol)"])?;
    for row in ranked {
        writer.write_record([
            row.rank.to_string().as_str(),
            row.ligand_id.as_str(),
            row.affinity.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Full aggregation pass over an output directory: parse, rank, write.
/// Returns the CSV path and the number of ranked ligands.
pub fn aggregate(output_dir: &Path, config: &ResultsConfig) -> Result<(PathBuf, usize)> {
    let results = collect_results(output_dir, config.id_token)?;
    let ranked = rank_results(results);
    let csv_path = output_dir.join(&config.output_file);
    write_ranked_csv(&ranked, &csv_path, &config.id_column)?;
    Ok((csv_path, ranked.len()))
}
