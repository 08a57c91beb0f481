//! Structured (JSON) report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Report;

/// Structured report. Map keys that are ids serialize as strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub timestamp: String,
    pub conflicts: BTreeMap<u64, Vec<JsonUsage>>,
    pub reserved_violations: BTreeMap<String, Vec<JsonViolation>>,
    pub discovered_ids: BTreeMap<u64, Vec<JsonUsage>>,
    pub statistics: JsonStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonUsage {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonViolation {
    pub name: String,
    pub id: u64,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonStatistics {
    pub total_ids: usize,
    pub conflict_count: usize,
    pub violation_count: usize,
    #[serde(default)]
    pub files_scanned: usize,
}

/// Build the structured report.
pub fn build_json(report: &Report) -> JsonReport {
    let registry = report.registry;
    let usages = |id: u64| -> Vec<JsonUsage> {
        registry
            .observations(id)
            .iter()
            .map(|o| JsonUsage {
                name: o.name.clone(),
                file: o.file.clone(),
            })
            .collect()
    };

    JsonReport {
        timestamp: report.timestamp.clone(),
        conflicts: registry.conflicts().map(|(id, _)| (id, usages(id))).collect(),
        reserved_violations: registry
            .violations()
            .iter()
            .map(|(range, list)| {
                let list = list
                    .iter()
                    .map(|v| JsonViolation {
                        name: v.name.clone(),
                        id: v.id,
                        file: v.file.clone(),
                    })
                    .collect();
                (range.clone(), list)
            })
            .collect(),
        discovered_ids: registry.ids().keys().map(|&id| (id, usages(id))).collect(),
        statistics: JsonStatistics {
            total_ids: registry.total_ids(),
            conflict_count: registry.conflict_count(),
            violation_count: registry.violation_count(),
            files_scanned: report.stats.files_scanned,
        },
    }
}

/// Render the structured report as pretty-printed JSON.
pub fn render_json(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&build_json(report))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{report, sample_registry};
    use crate::scan::ScanStats;

    #[test]
    fn test_json_uses_string_id_keys() {
        let registry = sample_registry();
        let stats = ScanStats {
            files_scanned: 3,
            ..Default::default()
        };
        let json = render_json(&report(&registry, &stats)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["conflicts"]["100"].as_array().unwrap().len(), 2);
        assert_eq!(value["discovered_ids"]["7"][0]["name"], "Ping");
        assert_eq!(value["reserved_violations"]["UniX SDK"][0]["id"], 210_000);
        assert_eq!(value["statistics"]["total_ids"], 3);
        assert_eq!(value["statistics"]["conflict_count"], 1);
        assert_eq!(value["statistics"]["violation_count"], 1);
        assert_eq!(value["statistics"]["files_scanned"], 3);
        assert_eq!(value["timestamp"], "2026-01-02 03:04:05");
    }
}
