//! Per-file substring scanning.
//!
//! One file in, exactly one [`FileOutcome`] out. Files are read as UTF-8
//! text line by line; the read stops at the first line containing the
//! pattern, so a match on line k costs at most k lines of I/O. Read and
//! decode failures carry the underlying error text verbatim.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::trace;

use crate::errors::{ScanError, ScanResult};
use crate::results::FileOutcome;

const BUFFER_CAPACITY: usize = 8192;

/// A validated, non-empty literal search pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(String);

impl Pattern {
    /// Validates and wraps a search pattern.
    ///
    /// An empty pattern would match every line of every file, so it is
    /// rejected before a scan can start.
    pub fn new(text: impl Into<String>) -> ScanResult<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(ScanError::EmptyPattern);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scans one file for the pattern and classifies the outcome.
pub fn scan_file(path: &Path, pattern: &Pattern) -> FileOutcome {
    trace!("Scanning file: {}", path.display());

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return FileOutcome::Failed(path.to_path_buf(), e.to_string()),
    };

    scan_reader(BufReader::with_capacity(BUFFER_CAPACITY, file), pattern, path)
}

/// Drives the line loop over any buffered reader.
///
/// Separated from [`scan_file`] so the early-exit and decode behavior can
/// be exercised against in-memory readers.
pub(crate) fn scan_reader<R: BufRead>(
    mut reader: R,
    pattern: &Pattern,
    path: &Path,
) -> FileOutcome {
    let mut line = String::with_capacity(256);

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => return FileOutcome::NotMatched,
            Ok(_) => {
                if line.contains(pattern.as_str()) {
                    return FileOutcome::Matched(path.to_path_buf());
                }
            }
            Err(e) => return FileOutcome::Failed(path.to_path_buf(), e.to_string()),
        }
    }
}
