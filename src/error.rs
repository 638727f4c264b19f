//! Engine-wide error taxonomy.
//!
//! Recoverable conditions at module boundaries return `EngineError`; invariant
//! violations (arena boundary corruption, OOM after reservation) are logged at
//! `Severity::Assert` and then panic, per the propagation policy in the spec.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("arena '{arena}' exceeded its {reserved}-byte reservation")]
    OutOfMemory { arena: &'static str, reserved: usize },

    #[error("boundary corruption detected in allocation from {file}:{line}")]
    BoundaryCorruption { file: &'static str, line: u32 },

    #[error("{what} capacity exceeded ({capacity} slots)")]
    CapacityExceeded { what: &'static str, capacity: usize },

    #[error("render graph compile could not reserve upload-ring space, retry next frame")]
    ResourceNotReady,

    #[error("shader compile failed for '{entry}' ({stage:?}): {message}")]
    ShaderCompileError {
        entry: String,
        stage: &'static str,
        message: String,
    },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("config file out of date (found version {found}, expected {expected})")]
    ConfigOutOfDate { found: u32, expected: u32 },

    #[error("config file has the wrong identity magic")]
    ConfigWrongMagic,
}

pub type Result<T> = std::result::Result<T, EngineError>;
