//! End-of-run console summary.

use colored::*;
use std::path::Path;

use super::{Report, ReportPaths, WriteOutcome};

/// Print the end-of-run summary for the operator.
pub fn print_summary(report: &Report, paths: &ReportPaths, outcome: &WriteOutcome) {
    let registry = report.registry;

    println!();
    println!("  {}", "Scan complete".bold());
    println!(
        "    {:<28} {}",
        "Files scanned:",
        report.stats.files_scanned
    );
    if report.stats.files_skipped > 0 {
        println!(
            "    {:<28} {}",
            "Files skipped:",
            report.stats.files_skipped.to_string().yellow()
        );
    }
    println!(
        "    {:<28} {}",
        format!("{} IDs found:", report.table_name),
        registry.total_ids()
    );
    println!(
        "    {:<28} {}",
        "Conflicting IDs:",
        colored_count(registry.conflict_count())
    );
    println!(
        "    {:<28} {}",
        "Reserved range violations:",
        colored_count(registry.violation_count())
    );
    println!();

    print_written("Text report", &paths.text, outcome.text_written);
    print_written("JSON report", &paths.json, outcome.json_written);
}

fn colored_count(n: usize) -> ColoredString {
    if n == 0 {
        n.to_string().green()
    } else {
        n.to_string().red().bold()
    }
}

fn print_written(label: &str, path: &Path, written: bool) {
    if written {
        println!("  {} {}: {}", "✓".green(), label, path.display());
    } else {
        println!("  {} {}: {}", "✗".red(), label, "not written".red());
    }
}
