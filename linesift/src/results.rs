//! Scan result and progress types.
//!
//! The engine owns these exclusively while a scan is running and hands a
//! finalized [`ScanResults`] to the caller exactly once; nothing here is
//! shared mutable state.

use serde::Serialize;
use std::path::PathBuf;

/// Classification of a single scanned file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The pattern occurs on at least one line of the file
    Matched(PathBuf),
    /// End of file reached without an occurrence
    NotMatched,
    /// The file could not be read or decoded; carries the verbatim error text
    Failed(PathBuf, String),
    /// An isolated read did not complete within the configured deadline
    TimedOut(PathBuf),
}

/// Progress snapshot delivered to the handler after every processed file
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanProgress {
    /// Number of files processed so far, capped at `files_total`
    pub files_processed: usize,
    /// Total file count from the pre-walk; stale if the tree mutates mid-scan
    pub files_total: usize,
    /// Completion percentage in `[0.0, 100.0]`
    pub percent: f64,
}

impl ScanProgress {
    /// Builds a progress snapshot from raw counters.
    ///
    /// `processed` is capped at `total` so a tree that grew after the
    /// pre-walk count never drives the percentage past 100.
    pub fn new(processed: usize, total: usize) -> Self {
        let files_processed = processed.min(total);
        let percent = if total == 0 {
            100.0
        } else {
            (files_processed as f64 / total as f64) * 100.0
        };
        Self {
            files_processed,
            files_total: total,
            percent,
        }
    }
}

/// Accumulated output of one scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResults {
    /// Files containing the pattern, in traversal order
    pub matched: Vec<PathBuf>,
    /// Files excluded with an error, in traversal order
    pub failed: Vec<(PathBuf, String)>,
}

impl ScanResults {
    /// Creates an empty result set
    pub fn new() -> Self {
        Default::default()
    }

    /// Folds one file outcome into the result set
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Matched(path) => self.matched.push(path),
            FileOutcome::NotMatched => {}
            FileOutcome::Failed(path, message) => self.failed.push((path, message)),
            FileOutcome::TimedOut(path) => {
                let message = "read timed out".to_string();
                self.failed.push((path, message));
            }
        }
    }

    /// Total number of files recorded as matched or failed
    pub fn reported_len(&self) -> usize {
        self.matched.len() + self.failed.len()
    }
}
