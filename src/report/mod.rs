//! Report rendering and output.
//!
//! Two renderers read the same finished [`Registry`]:
//! - Text: sectioned plain-text report for people
//! - JSON: the same facts as a nested document for tooling
//!
//! Writing is best-effort per file. A failed text write falls back to
//! printing the report on stdout; a failed JSON write is only logged.

mod json;
mod paths;
mod summary;
mod text;

pub use json::{build_json, render_json, JsonReport, JsonStatistics, JsonUsage, JsonViolation};
pub use paths::ReportPaths;
pub use summary::print_summary;
pub use text::render_text;

use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::scan::{Registry, ScanStats};

/// A finished scan, ready to render.
pub struct Report<'a> {
    pub registry: &'a Registry,
    pub stats: &'a ScanStats,
    /// Table name used in headings, e.g. `NetMsg`.
    pub table_name: &'a str,
    /// Shared by both renderers so the two files agree.
    pub timestamp: String,
}

impl<'a> Report<'a> {
    /// Build a report stamped with the current local time.
    pub fn new(registry: &'a Registry, stats: &'a ScanStats, table_name: &'a str) -> Self {
        Self {
            registry,
            stats,
            table_name,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Which report files made it to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub text_written: bool,
    pub json_written: bool,
}

/// Write both reports. Never fails; each file is attempted independently.
pub fn write_reports(report: &Report, paths: &ReportPaths) -> WriteOutcome {
    let text = render_text(report);
    let text_written = match write_file(&paths.text, &text) {
        Ok(()) => {
            tracing::info!("text report written to {}", paths.text.display());
            true
        }
        Err(e) => {
            tracing::error!("{:?}", e);
            println!("{}", text);
            false
        }
    };

    let json_written = match render_json(report).and_then(|json| write_file(&paths.json, &json)) {
        Ok(()) => {
            tracing::info!("JSON report written to {}", paths.json.display());
            true
        }
        Err(e) => {
            tracing::error!("{:?}", e);
            false
        }
    };

    WriteOutcome {
        text_written,
        json_written,
    }
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
