use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::platform;

/// Configuration for one scan.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of
/// precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.linesift.yaml` in the current directory
/// 3. Global `$HOME/.config/linesift/config.yaml`
///
/// # Configuration Format
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Literal substring to search for
/// pattern: "connection refused"
///
/// # Root directory to scan; omit to use the privilege-based default
/// root_path: "/var/log"
///
/// # File extensions to include
/// file_extensions:
///   - "log"
///   - "txt"
///
/// # Paths to skip (glob syntax)
/// ignore_patterns:
///   - "**/*.gz"
///
/// # Run each file read on the isolated reader with a deadline
/// isolate_reads: true
/// read_timeout_secs: 10
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// # CLI Integration
///
/// When using the CLI, command-line arguments take precedence over config
/// file values. The merging behavior is defined in the `merge_with_cli`
/// method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Literal substring to search for (not a regex)
    #[serde(default)]
    pub pattern: String,

    /// Root directory to scan. When absent the scan root follows the
    /// privilege policy: filesystem root for elevated processes, the
    /// current directory otherwise.
    #[serde(default)]
    pub root_path: Option<PathBuf>,

    /// Optional list of file extensions to include (e.g., ["log", "txt"])
    /// If None, all files are scanned
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,

    /// Paths to skip (supports glob syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Whether the traversal follows symbolic links
    #[serde(default)]
    pub follow_links: bool,

    /// Run each file read on the isolated reader thread so a stalled read
    /// cannot hang the scan
    #[serde(default)]
    pub isolate_reads: bool,

    /// Wall-clock budget in seconds for one isolated file read
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_read_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            root_path: None,
            file_extensions: None,
            ignore_patterns: Vec::new(),
            follow_links: false,
            isolate_reads: false,
            read_timeout_secs: default_read_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("linesift/config.yaml")),
            // Local config
            Some(PathBuf::from(".linesift.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: ScanConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.pattern.is_empty() {
            self.pattern = cli_config.pattern;
        }
        if cli_config.root_path.is_some() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.file_extensions.is_some() {
            self.file_extensions = cli_config.file_extensions;
        }
        if !cli_config.ignore_patterns.is_empty() {
            self.ignore_patterns = cli_config.ignore_patterns;
        }
        if cli_config.follow_links {
            self.follow_links = true;
        }
        if cli_config.isolate_reads {
            self.isolate_reads = true;
        }
        if cli_config.read_timeout_secs != default_read_timeout() {
            self.read_timeout_secs = cli_config.read_timeout_secs;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }

    /// The directory the scan actually starts from
    pub fn effective_root(&self) -> PathBuf {
        self.root_path
            .clone()
            .unwrap_or_else(platform::default_scan_root)
    }

    /// The per-file read budget as a `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            pattern: "connection refused"
            root_path: "/var/log"
            file_extensions: ["log", "txt"]
            ignore_patterns: ["**/*.gz"]
            follow_links: true
            isolate_reads: true
            read_timeout_secs: 5
            log_level: "debug"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = ScanConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.pattern, "connection refused");
        assert_eq!(config.root_path, Some(PathBuf::from("/var/log")));
        assert_eq!(
            config.file_extensions,
            Some(vec!["log".to_string(), "txt".to_string()])
        );
        assert_eq!(config.ignore_patterns, vec!["**/*.gz".to_string()]);
        assert!(config.follow_links);
        assert!(config.isolate_reads);
        assert_eq!(config.read_timeout_secs, 5);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_merge_with_cli() {
        let config_file = ScanConfig {
            pattern: "from-file".to_string(),
            root_path: Some(PathBuf::from("/srv")),
            file_extensions: Some(vec!["log".to_string()]),
            ignore_patterns: vec!["**/*.gz".to_string()],
            follow_links: false,
            isolate_reads: false,
            read_timeout_secs: 5,
            log_level: "warn".to_string(),
        };

        let cli_config = ScanConfig {
            pattern: "from-cli".to_string(),
            root_path: Some(PathBuf::from("/tmp")),
            file_extensions: None,
            ignore_patterns: vec!["**/*.tmp".to_string()],
            follow_links: true,
            isolate_reads: true,
            read_timeout_secs: 10, // default: does not override
            log_level: "debug".to_string(),
        };

        let merged = config_file.merge_with_cli(cli_config);
        assert_eq!(merged.pattern, "from-cli"); // CLI value
        assert_eq!(merged.root_path, Some(PathBuf::from("/tmp"))); // CLI value
        assert_eq!(merged.file_extensions, Some(vec!["log".to_string()])); // File value (CLI None)
        assert_eq!(merged.ignore_patterns, vec!["**/*.tmp".to_string()]); // CLI value
        assert!(merged.follow_links); // CLI value
        assert!(merged.isolate_reads); // CLI value
        assert_eq!(merged.read_timeout_secs, 5); // File value (CLI left default)
        assert_eq!(merged.log_level, "debug"); // CLI value
    }

    #[test]
    fn test_default_values() {
        let config_content = r#"
            pattern: "test"
        "#;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = ScanConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.pattern, "test");
        assert_eq!(config.root_path, None);
        assert_eq!(config.file_extensions, None);
        assert!(config.ignore_patterns.is_empty());
        assert!(!config.follow_links);
        assert!(!config.isolate_reads);
        assert_eq!(config.read_timeout_secs, 10);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_explicit_root_wins_over_policy() {
        let config = ScanConfig {
            root_path: Some(PathBuf::from("/srv/data")),
            ..Default::default()
        };
        assert_eq!(config.effective_root(), PathBuf::from("/srv/data"));
    }

    #[test]
    fn test_invalid_config() {
        let config_content = r#"
            pattern: 123  # Should be string
            root_path: []  # Should be string
            read_timeout_secs: "invalid"  # Should be number
        "#;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let result = ScanConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }
}
