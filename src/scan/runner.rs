//! Scan runner that drives walker, reader, extractor and registry.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::Config;

use super::{read_source, walk, Extractor, Registry, ScanStats};

/// Everything a scan produced.
#[derive(Debug)]
pub struct ScanOutcome {
    pub registry: Registry,
    pub stats: ScanStats,
}

/// Scans one project root with one configuration.
pub struct Runner<'a> {
    root: PathBuf,
    config: &'a Config,
    extractor: Extractor,
}

impl<'a> Runner<'a> {
    /// Create a runner for `root`; fails only if the table patterns do not compile.
    pub fn new<P: AsRef<Path>>(root: P, config: &'a Config) -> anyhow::Result<Self> {
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            config,
            extractor: Extractor::new(&config.table_name)?,
        })
    }

    /// Collect the distinct files to scan, in scan-directory order.
    ///
    /// Scan directories may nest (`src` and `src/Public`); each file is
    /// listed once.
    pub fn collect_files(&self, stats: &mut ScanStats) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut files = Vec::new();

        for dir in &self.config.scan_dirs {
            tracing::info!("scanning directory: {}", dir);
            if !self.root.join(dir).is_dir() {
                stats.missing_dirs.push(dir.clone());
            }

            let found = walk(&self.root, dir, &self.config.file_extensions);
            if found.is_empty() {
                tracing::warn!(
                    "no {} files found in {}",
                    self.config.file_extensions.join(", "),
                    dir
                );
                continue;
            }
            tracing::info!("found {} files in {}", found.len(), dir);

            for file in found {
                if self.config.is_path_excluded(&file) {
                    tracing::debug!("excluded by config: {}", file);
                    continue;
                }
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        files
    }

    /// Run the full scan. Per-file problems are logged and skipped.
    pub fn run(&self) -> anyhow::Result<ScanOutcome> {
        let mut stats = ScanStats::default();
        let mut registry = Registry::new();

        for file in self.collect_files(&mut stats) {
            if self.scan_file(&file, &mut registry) {
                stats.files_scanned += 1;
            } else {
                stats.files_skipped += 1;
            }
        }

        Ok(ScanOutcome { registry, stats })
    }

    /// Parse one root-relative file into `registry`. Returns `false` if the
    /// file was skipped.
    pub fn scan_file(&self, rel_path: &str, registry: &mut Registry) -> bool {
        let path = self.root.join(rel_path);
        let (content, encoding) = match read_source(&path, self.config.max_file_bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!("skipping {}: {}", rel_path, e);
                return false;
            }
        };
        tracing::debug!("decoded {} as {}", rel_path, encoding);

        let declarations = self.extractor.extract(&content);
        let mut added = 0;
        for decl in &declarations {
            if registry.register(&decl.name, decl.id, rel_path, self.config) {
                added += 1;
            }
        }
        tracing::debug!(
            "{}: {} declarations matched, {} new",
            rel_path,
            declarations.len(),
            added
        );

        true
    }
}
