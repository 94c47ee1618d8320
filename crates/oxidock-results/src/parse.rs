//! Extracting the best pose score and the ligand identity from a
//! per-ligand engine log.

use std::path::Path;

use crate::Result;

/// Scan an engine log for the rank-1 pose row and return its binding
/// affinity (kcal/mol, more negative is better).
///
/// The engine prints a table whose data rows start with the pose rank;
/// the first row whose leading token is `1` carries the best score in
/// its second column. Returns None when no such row exists or the
/// score column is malformed — the ligand is simply excluded from the
/// ranked table.
pub fn best_affinity(log_path: &Path) -> Result<Option<f64>> {
    let content = std::fs::read_to_string(log_path)?;
    for line in content.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some("1") {
            return Ok(tokens.next().and_then(|t| t.parse::<f64>().ok()));
        }
    }
    Ok(None)
}

/// Ligand name from a log filename: `<name>_log.txt` → `<name>`.
pub fn ligand_name_from_log(log_path: &Path) -> Option<String> {
    let stem = log_path.file_stem()?.to_str()?;
    Some(stem.strip_suffix("_log").unwrap_or(stem).to_string())
}

/// Library identifier: the `token`-th underscore-separated piece of
/// the ligand name (e.g. `mol_DB00123` → `DB00123`), falling back to
/// the full name when that token is absent.
pub fn library_id(ligand_name: &str, token: usize) -> String {
    ligand_name
        .split('_')
        .nth(token)
        .unwrap_or(ligand_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VINA_LOG: &str = "\
Scoring function : vina
Rigid receptor: 3X1J.pdbqt
mode |   affinity | dist from best mode
     | (kcal/mol) | rmsd l.b.| rmsd u.b.
-----+------------+----------+----------
   1       -9.302          0          0
   2       -8.75       1.933      2.964
   3       -8.101      2.262      5.553
";

    fn write_log(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_best_affinity_reads_rank_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_log(dir.path(), "mol_DB1_log.txt", VINA_LOG);
        assert_eq!(best_affinity(&log).unwrap(), Some(-9.302));
    }

    #[test]
    fn test_log_without_rank_one_row_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_log(
            dir.path(),
            "mol_DB2_log.txt",
            "Scoring function : vina\nWARNING: no poses found\n",
        );
        assert_eq!(best_affinity(&log).unwrap(), None);
    }

    #[test]
    fn test_malformed_score_column_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_log(dir.path(), "mol_DB3_log.txt", "   1   not-a-number   0   0\n");
        assert_eq!(best_affinity(&log).unwrap(), None);
    }

    #[test]
    fn test_rank_token_must_match_exactly() {
        // "10" and "1.5" are not the rank-1 row.
        let dir = tempfile::tempdir().unwrap();
        let log = write_log(
            dir.path(),
            "mol_DB4_log.txt",
            "  10   -4.0   0   0\n  1.5   -3.0   0   0\n   1   -6.25   0   0\n",
        );
        assert_eq!(best_affinity(&log).unwrap(), Some(-6.25));
    }

    #[test]
    fn test_ligand_name_strips_log_suffix() {
        assert_eq!(
            ligand_name_from_log(Path::new("/out/mol_DB00123_log.txt")),
            Some("mol_DB00123".to_string())
        );
        assert_eq!(
            ligand_name_from_log(Path::new("plain.txt")),
            Some("plain".to_string())
        );
    }

    #[test]
    fn test_library_id_with_fallback() {
        assert_eq!(library_id("mol_DB00123", 1), "DB00123");
        assert_eq!(library_id("aspirin", 1), "aspirin");
    }
}
