//! Plain-text report.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::Report;
use crate::scan::Registry;

const RULE: &str = "============================================";
const SECTION_RULE: &str = "--------------------------------------------";

/// Render the plain-text report.
pub fn render_text(report: &Report) -> String {
    let registry = report.registry;
    let table = report.table_name;
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  {} ID Conflict Report", table);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {}", report.timestamp);
    let _ = writeln!(out, "Files scanned: {}", report.stats.files_scanned);
    let _ = writeln!(out, "Total {} IDs: {}", table, registry.total_ids());
    let _ = writeln!(out, "Conflicting IDs: {}", registry.conflict_count());
    let _ = writeln!(out, "Reserved range violations: {}", registry.violation_count());
    let _ = writeln!(out);

    write_conflict_section(&mut out, registry);
    let _ = writeln!(out);
    write_violation_section(&mut out, registry);
    let _ = writeln!(out);
    write_id_index(&mut out, registry, table);
    let _ = writeln!(out);
    write_name_index(&mut out, registry, table);

    out
}

fn write_section_heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", SECTION_RULE);
}

fn write_conflict_section(out: &mut String, registry: &Registry) {
    write_section_heading(out, "1. ID conflicts");

    if registry.conflict_count() == 0 {
        let _ = writeln!(out, "No ID conflicts found.");
        return;
    }

    let _ = writeln!(out, "Found {} conflicting IDs:", registry.conflict_count());
    for (id, usages) in registry.conflicts() {
        let _ = writeln!(out);
        let _ = writeln!(out, "ID {} has {} distinct definitions:", id, usages.len());

        // Group names by file
        let mut by_file: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for usage in usages {
            let names = by_file.entry(usage.file.as_str()).or_default();
            if !names.contains(&usage.name.as_str()) {
                names.push(usage.name.as_str());
            }
        }

        for (file, mut names) in by_file {
            if names.len() == 1 {
                let _ = writeln!(out, "  - {} ({})", names[0], file);
            } else {
                let _ = writeln!(out, "  - {} has multiple definitions:", file);
                names.sort_unstable();
                for name in names {
                    let _ = writeln!(out, "    * {}", name);
                }
            }
        }
    }
}

fn write_violation_section(out: &mut String, registry: &Registry) {
    write_section_heading(out, "2. Reserved range violations");

    if registry.violation_count() == 0 {
        let _ = writeln!(out, "No reserved range violations found.");
        return;
    }

    for (range, violations) in registry.violations() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Range {:?}: {} unauthorized uses:",
            range,
            violations.len()
        );
        for v in violations {
            let _ = writeln!(out, "  - {} = {} ({})", v.name, v.id, v.file);
        }
    }
}

fn write_id_index(out: &mut String, registry: &Registry, table: &str) {
    write_section_heading(out, &format!("3. All {} IDs (by ID)", table));

    for (id, usages) in registry.ids() {
        let label = id.to_string();
        for (i, usage) in usages.iter().enumerate() {
            if i == 0 {
                let _ = writeln!(out, "{}: {} ({})", label, usage.name, usage.file);
            } else {
                let _ = writeln!(
                    out,
                    "{:width$}  {} ({})",
                    "",
                    usage.name,
                    usage.file,
                    width = label.len()
                );
            }
        }
    }
}

fn write_name_index(out: &mut String, registry: &Registry, table: &str) {
    write_section_heading(out, &format!("4. All {} IDs (by name)", table));

    let mut entries: Vec<_> = registry.ids().values().flatten().collect();
    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
            .then(a.file.cmp(&b.file))
    });

    for o in entries {
        let _ = writeln!(out, "{}: {} ({})", o.name, o.id, o.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::report::fixtures::{report, sample_registry};
    use crate::scan::ScanStats;

    #[test]
    fn test_text_sections_in_order() {
        let registry = sample_registry();
        let stats = ScanStats::default();
        let text = render_text(&report(&registry, &stats));

        let positions: Vec<usize> = [
            "NetMsg ID Conflict Report",
            "1. ID conflicts",
            "2. Reserved range violations",
            "3. All NetMsg IDs (by ID)",
            "4. All NetMsg IDs (by name)",
        ]
        .iter()
        .map(|h| text.find(h).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("Generated: 2026-01-02 03:04:05"));
    }

    #[test]
    fn test_text_conflict_lists_each_file() {
        let registry = sample_registry();
        let stats = ScanStats::default();
        let text = render_text(&report(&registry, &stats));

        assert!(text.contains("ID 100 has 2 distinct definitions:"));
        assert!(text.contains("  - Login (src/a.lua)"));
        assert!(text.contains("  - Logout (src/b.lua)"));
        assert!(text.contains("Range \"UniX SDK\": 1 unauthorized uses:"));
        assert!(text.contains("  - Test = 210000 (src/game.lua)"));
    }

    #[test]
    fn test_text_groups_multiple_names_in_one_file() {
        let config = Config::default();
        let mut registry = Registry::new();
        registry.register("SignIn", 5, "src/a.lua", &config);
        registry.register("Login", 5, "src/a.lua", &config);
        let stats = ScanStats::default();
        let text = render_text(&report(&registry, &stats));

        assert!(text.contains("  - src/a.lua has multiple definitions:\n    * Login\n    * SignIn\n"));
    }

    #[test]
    fn test_text_empty_registry() {
        let registry = Registry::new();
        let stats = ScanStats::default();
        let text = render_text(&report(&registry, &stats));

        assert!(text.contains("No ID conflicts found."));
        assert!(text.contains("No reserved range violations found."));
        assert!(text.contains("Total NetMsg IDs: 0"));
    }

    #[test]
    fn test_text_indexes_list_every_name() {
        let registry = sample_registry();
        let stats = ScanStats::default();
        let text = render_text(&report(&registry, &stats));

        assert!(text.contains("7: Ping (src/a.lua)\n100: Login (src/a.lua)\n     Logout (src/b.lua)\n"));
        let by_name = &text[text.find("4. All NetMsg IDs (by name)").unwrap()..];
        let login = by_name.find("Login: 100 (src/a.lua)").unwrap();
        let logout = by_name.find("Logout: 100 (src/b.lua)").unwrap();
        let ping = by_name.find("Ping: 7 (src/a.lua)").unwrap();
        assert!(login < logout && logout < ping);
    }

    #[test]
    fn test_name_index_is_case_insensitive() {
        let config = Config::default();
        let mut registry = Registry::new();
        registry.register("beta", 1, "a.lua", &config);
        registry.register("Alpha", 2, "a.lua", &config);
        let stats = ScanStats::default();
        let text = render_text(&report(&registry, &stats));

        let by_name = &text[text.find("(by name)").unwrap()..];
        assert!(by_name.find("Alpha: 2").unwrap() < by_name.find("beta: 1").unwrap());
    }
}
