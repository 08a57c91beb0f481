//! Bookkeeping of every id seen during a run.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Config;

use super::{Observation, ReservedViolation};

/// All observations of one run, keyed by numeric id.
///
/// Observations under an id keep discovery order; exact repeats of a
/// `(name, file)` pair are dropped. An id is a conflict as soon as it holds
/// more than one distinct `(name, file)` pair.
#[derive(Debug, Default)]
pub struct Registry {
    ids: BTreeMap<u64, Vec<Observation>>,
    conflicts: BTreeSet<u64>,
    violations: BTreeMap<String, Vec<ReservedViolation>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name = id` seen in `file`. Returns `false` for a repeat.
    ///
    /// New observations are also checked against the reserved ranges.
    pub fn register(&mut self, name: &str, id: u64, file: &str, config: &Config) -> bool {
        let usages = self.ids.entry(id).or_default();
        if usages.iter().any(|o| o.name == name && o.file == file) {
            return false;
        }

        usages.push(Observation::new(id, name, file));
        if usages.len() > 1 {
            self.conflicts.insert(id);
        }

        self.check_reserved(name, id, file, config);
        true
    }

    /// Record a violation for every reserved range containing `id`, unless
    /// `file` is inside the SDK's own subtree.
    pub fn check_reserved(&mut self, name: &str, id: u64, file: &str, config: &Config) {
        if config.is_sdk_path(file) {
            return;
        }

        for range in config.reserved_ranges.iter().filter(|r| r.contains(id)) {
            let list = self.violations.entry(range.name.clone()).or_default();
            if list
                .iter()
                .any(|v| v.id == id && v.name == name && v.file == file)
            {
                continue;
            }
            list.push(ReservedViolation {
                name: name.to_string(),
                id,
                file: file.to_string(),
            });
        }
    }

    /// Every id with its observations, in ascending id order.
    pub fn ids(&self) -> &BTreeMap<u64, Vec<Observation>> {
        &self.ids
    }

    pub fn observations(&self, id: u64) -> &[Observation] {
        self.ids.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Conflicting ids with their observations, in ascending id order.
    pub fn conflicts(&self) -> impl Iterator<Item = (u64, &[Observation])> + '_ {
        self.conflicts
            .iter()
            .map(move |&id| (id, self.observations(id)))
    }

    pub fn is_conflict(&self, id: u64) -> bool {
        self.conflicts.contains(&id)
    }

    /// Violations grouped by reserved range name.
    pub fn violations(&self) -> &BTreeMap<String, Vec<ReservedViolation>> {
        &self.violations
    }

    pub fn total_ids(&self) -> usize {
        self.ids.len()
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }
}
