//! Checker configuration.
//!
//! A `Config` is built once at startup (defaults, or a YAML file) and then
//! passed by reference to every stage of the scan.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file names looked up in the project root.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["netmsg-check.yaml", ".netmsg-check.yaml"];

/// Errors found while validating a configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no scan directories configured")]
    NoScanDirs,
    #[error("no file extensions configured")]
    NoExtensions,
    #[error("table name {0:?} is not a valid identifier")]
    BadTableName(String),
    #[error("reserved range #{0} has an empty name")]
    UnnamedRange(usize),
    #[error("reserved range {name:?} has min {min} greater than max {max}")]
    InvertedRange { name: String, min: u64, max: u64 },
    #[error("{0} must not be empty")]
    EmptyMarker(&'static str),
    #[error("max_file_bytes must be greater than zero")]
    ZeroSizeCap,
    #[error("invalid exclude pattern {pattern:?}: {reason}")]
    BadExclude { pattern: String, reason: String },
}

/// A numeric interval owned by one party (usually the SDK).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReservedRange {
    pub name: String,
    pub min: u64,
    pub max: u64,
}

impl ReservedRange {
    pub fn new(name: impl Into<String>, min: u64, max: u64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, id: u64) -> bool {
        self.min <= id && id <= self.max
    }
}

/// Top-level checker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directories to scan, relative to the project root.
    pub scan_dirs: Vec<String>,
    /// File name suffixes to include (e.g. ".lua").
    pub file_extensions: Vec<String>,
    /// Name of the identifier table, e.g. `NetMsg` in `Foo.NetMsg = { ... }`.
    pub table_name: String,
    pub reserved_ranges: Vec<ReservedRange>,
    /// Path component that marks the SDK's own source subtree.
    pub sdk_marker: String,
    /// Directory whose presence identifies a project root.
    pub project_marker: String,
    /// Where the tool itself lives inside a project.
    pub tools_dir: String,
    pub output_path: String,
    pub json_output_path: String,
    /// Files larger than this are skipped entirely.
    pub max_file_bytes: u64,
    /// How many directories `--auto-detect` may climb.
    pub auto_detect_levels: usize,
    /// Glob patterns for root-relative paths to leave out of the scan.
    pub excluded_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_dirs: vec!["src/Public".to_string(), "src".to_string()],
            file_extensions: vec![".lua".to_string()],
            table_name: "NetMsg".to_string(),
            reserved_ranges: vec![ReservedRange::new("UniX SDK", 200_000, 250_000)],
            sdk_marker: "UniX-SDK".to_string(),
            project_marker: "src".to_string(),
            tools_dir: "src/Public/UniX-SDK/tools".to_string(),
            output_path: "src/Public/UniX-SDK/tools/netmsg_report.txt".to_string(),
            json_output_path: "src/Public/UniX-SDK/tools/netmsg_report.json".to_string(),
            max_file_bytes: 10 * 1024 * 1024,
            auto_detect_levels: 5,
            excluded_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the first default-named config file found in `root`, or the
    /// built-in defaults when there is none.
    pub fn discover(root: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        for name in DEFAULT_CONFIG_NAMES {
            let path = root.join(name);
            if path.is_file() {
                let config = Self::parse_file(&path)
                    .map_err(|e| anyhow::anyhow!("parsing config {}: {}", path.display(), e))?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Check if a root-relative path matches one of `excluded_paths`.
    pub fn is_path_excluded(&self, rel_path: &str) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(rel_path) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether a root-relative path lies inside the SDK's own subtree.
    pub fn is_sdk_path(&self, rel_path: &str) -> bool {
        rel_path
            .split(|c: char| c == '/' || c == '\\')
            .any(|component| component == self.sdk_marker)
    }
}

/// Validate a configuration before any scanning happens.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.scan_dirs.is_empty() {
        return Err(ConfigError::NoScanDirs);
    }
    if config.file_extensions.iter().all(|e| e.is_empty()) {
        return Err(ConfigError::NoExtensions);
    }
    if !is_identifier(&config.table_name) {
        return Err(ConfigError::BadTableName(config.table_name.clone()));
    }
    for (i, range) in config.reserved_ranges.iter().enumerate() {
        if range.name.trim().is_empty() {
            return Err(ConfigError::UnnamedRange(i));
        }
        if range.min > range.max {
            return Err(ConfigError::InvertedRange {
                name: range.name.clone(),
                min: range.min,
                max: range.max,
            });
        }
    }
    if config.sdk_marker.trim().is_empty() {
        return Err(ConfigError::EmptyMarker("sdk_marker"));
    }
    if config.project_marker.trim().is_empty() {
        return Err(ConfigError::EmptyMarker("project_marker"));
    }
    if config.max_file_bytes == 0 {
        return Err(ConfigError::ZeroSizeCap);
    }
    for pattern in &config.excluded_paths {
        if let Err(e) = globset::Glob::new(pattern) {
            return Err(ConfigError::BadExclude {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
