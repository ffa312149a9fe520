//! Structured error types for lockscope
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Malformed or out-of-order dump lines are never errors; only failures of
//! the input source or of an output sink are.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Failed to open thread dump {path}: {source}")]
    OpenFailed { path: PathBuf, source: std::io::Error },

    #[error("Failed to read line {line} of thread dump: {source}")]
    ReadFailed { line: usize, source: std::io::Error },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {what} to {path}: {source}")]
    WriteFailed { what: &'static str, path: PathBuf, source: std::io::Error },

    #[error("Failed to serialize report: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
