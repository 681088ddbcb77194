//! Path-based filtering applied during traversal.
//!
//! Filters narrow which files a scan visits; they are applied identically by
//! the pre-walk count and the scan walk so the progress denominator matches
//! what is actually processed. With no extension list and no ignore patterns
//! every regular file is visited, including binaries — those surface later
//! as decode failures, not as skipped paths.

use glob::Pattern;
use std::path::Path;

/// Checks if a file passes the optional extension whitelist
pub fn has_valid_extension(path: &Path, extensions: &Option<Vec<String>>) -> bool {
    match extensions {
        None => true,
        Some(exts) => {
            if let Some(ext) = path.extension() {
                if let Some(ext_str) = ext.to_str() {
                    return exts.iter().any(|e| e.eq_ignore_ascii_case(ext_str));
                }
            }
            false
        }
    }
}

/// Checks if a path matches any of the ignore glob patterns
pub fn should_ignore(path: &Path, ignore_patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();

    ignore_patterns.iter().any(|pattern| {
        if let Ok(p) = Pattern::new(pattern) {
            let normalized_path = path_str.replace('\\', "/");
            p.matches(&normalized_path)
        } else {
            false
        }
    })
}

/// Determines if a file should be visited by the scan
pub fn should_include_file(
    path: &Path,
    extensions: &Option<Vec<String>>,
    ignore_patterns: &[String],
) -> bool {
    has_valid_extension(path, extensions) && !should_ignore(path, ignore_patterns)
}
