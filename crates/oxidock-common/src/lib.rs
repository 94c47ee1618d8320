//! oxidock-common — Shared error type and configuration used across all
//! oxidock crates.

pub mod config;
pub mod error;
pub mod fsops;

pub use config::{
    DriverConfig, EngineConfig, FailureMode, PathsConfig, PipelineConfig, PrepareConfig,
    ResultsConfig, SkipPolicy,
};
pub use error::{OxidockError, Result};
