//! Batch preparation against a stub converter executable.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use oxidock_common::PrepareConfig;
use oxidock_prepare::StructurePreparer;

/// Stub obabel: fails for inputs whose name contains "bad", otherwise
/// writes a line to the `-O` target.
fn write_stub_converter(dir: &Path) -> PathBuf {
    let path = dir.join("fake-obabel");
    std::fs::write(
        &path,
        r#"#!/bin/sh
in="$1"
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-O" ]; then out="$a"; fi
  prev="$a"
done
case "$in" in
  *bad*) echo "obabel: error reading molecule" >&2; exit 1;;
esac
echo "HETATM    1  C   LIG A   1" > "$out"
"#,
    )
    .unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn preparer_with(converter: PathBuf) -> StructurePreparer {
    StructurePreparer::new(&PrepareConfig {
        converter_path: converter,
        ..PrepareConfig::default()
    })
}

#[tokio::test]
async fn faulty_inputs_are_moved_and_batch_continues() {
    let root = tempfile::tempdir().unwrap();
    let (input, output, faulty) = (
        root.path().join("input"),
        root.path().join("output"),
        root.path().join("faulty"),
    );
    std::fs::create_dir_all(&input).unwrap();
    for name in ["mol_DB1.sdf", "bad_DB2.sdf", "mol_DB3.sdf", "ignore.txt"] {
        std::fs::write(input.join(name), "fake sdf").unwrap();
    }

    let preparer = preparer_with(write_stub_converter(root.path()));
    let summary = preparer
        .prepare_batch(&input, &output, &faulty)
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 1);

    assert!(output.join("mol_DB1.pdbqt").exists());
    assert!(output.join("mol_DB3.pdbqt").exists());
    assert!(!output.join("bad_DB2.pdbqt").exists());

    // Moved, not copied: gone from the input directory.
    assert!(!input.join("bad_DB2.sdf").exists());
    assert!(faulty.join("bad_DB2.sdf").exists());
    // Healthy inputs stay in place.
    assert!(input.join("mol_DB1.sdf").exists());
}

#[tokio::test]
async fn prepare_file_produces_pdbqt_next_to_other_outputs() {
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("output");
    std::fs::create_dir_all(&output).unwrap();
    let input = root.path().join("mol_DB7.sdf");
    std::fs::write(&input, "fake sdf").unwrap();

    let preparer = preparer_with(write_stub_converter(root.path()));
    let produced = preparer.prepare_file(&input, &output).await.unwrap();

    assert_eq!(produced, output.join("mol_DB7.pdbqt"));
    assert!(produced.exists());
    // The intermediate PDB is cleaned up.
    let leftovers: Vec<_> = std::fs::read_dir(&output)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "pdb").unwrap_or(false))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn missing_converter_is_not_available() {
    let preparer = preparer_with(PathBuf::from("/nonexistent/obabel"));
    assert!(!preparer.is_available().await);
}
