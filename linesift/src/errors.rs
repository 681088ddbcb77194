//! Error types for scan operations.
//!
//! Only two failures abort anything: an empty search pattern (the scan is
//! never started) and a configuration-loading problem. Every per-file
//! failure during a scan is captured as a [`FileOutcome`](crate::results::FileOutcome)
//! and accumulated in the results instead of being raised here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while setting up or driving a scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Search pattern must not be empty")]
    EmptyPattern,
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScanError {
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
