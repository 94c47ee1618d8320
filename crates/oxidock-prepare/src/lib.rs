//! oxidock-prepare — Converts raw small-molecule files into
//! docking-ready PDBQT.
//!
//! All chemistry is delegated to Open Babel: 3D embedding, hydrogen
//! addition, and force-field minimization in a first pass, then
//! conversion with Gasteiger partial charges. Inputs that fail any
//! stage are moved to the faulty directory and the batch continues.

pub mod preparer;

pub use preparer::{PrepareSummary, StructurePreparer};
