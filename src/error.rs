//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions.

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the scan engine.
///
/// Per-port transport failures never appear here; they are folded into a
/// closed result. Only invalid input and an unresolvable target escape.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid port specification: {0}")]
    InvalidPortSpec(#[from] PortError),

    #[error("invalid concurrency {value}: must be between {min} and {max}")]
    InvalidConcurrency { value: i64, min: usize, max: usize },

    #[error("invalid timeout: must be a positive number of seconds")]
    InvalidTimeout,

    #[error("target unresolvable: {0}")]
    TargetUnresolvable(#[from] TargetError),

    #[error("probe task failed: {0}")]
    TaskFailed(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {}: {}", .path.display(), .reason)]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
