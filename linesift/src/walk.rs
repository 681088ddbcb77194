//! Recursive directory traversal.
//!
//! The traverser yields regular files only, lazily, in a single
//! non-restartable pass; directories themselves are never yielded.
//! Enumeration errors (unreadable subdirectories, dangling entries) are
//! skipped and logged at debug level — they are not read errors and never
//! appear in the scan results.
//!
//! Symbolic links are not followed unless `follow_links` is set, so link
//! cycles cannot occur by default. With following enabled the underlying
//! walker detects link loops and reports them as enumeration errors, which
//! are skipped like any other.

use ignore::WalkBuilder;
use std::path::PathBuf;
use tracing::debug;

use crate::config::ScanConfig;
use crate::filters::should_include_file;

/// Lazily yields every regular file under the configured root.
///
/// The same filters drive [`count_files`], keeping the progress
/// denominator consistent with what the scan actually visits.
pub fn walk_files(config: &ScanConfig) -> impl Iterator<Item = PathBuf> + '_ {
    let mut builder = WalkBuilder::new(config.effective_root());
    builder
        .hidden(false)
        .standard_filters(false)
        .follow_links(config.follow_links);

    builder
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(move |entry| {
            should_include_file(
                entry.path(),
                &config.file_extensions,
                &config.ignore_patterns,
            )
        })
        .map(|entry| entry.into_path())
}

/// Counts the files a scan of `config` would visit.
///
/// This is the full pre-walk used for progress percentages; the total goes
/// stale if the tree mutates between the count and the scan.
pub fn count_files(config: &ScanConfig) -> usize {
    walk_files(config).count()
}
