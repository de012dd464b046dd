//! Snapshot comparison: finding deltas and host deltas.
//!
//! Both comparators are plain set differences over full-row identity.
//! Results keep the first-appearance order of the side they come from
//! so reports are stable between runs, but callers must treat them as
//! sets.

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

use crate::types::{FindingRow, HostTriple};

/// Findings that appeared or disappeared between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDelta {
    /// Present in current, absent from previous.
    pub newly_added: Vec<FindingRow>,
    /// Present in previous, absent from current.
    pub newly_fixed: Vec<FindingRow>,
}

/// Hosts that appeared or disappeared, plus the full current inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostDelta {
    /// Every distinct host of the current snapshot, in first-seen order.
    pub host_overview: Vec<HostTriple>,
    pub new_hosts: Vec<HostTriple>,
    pub disappeared_hosts: Vec<HostTriple>,
}

/// Counts describing one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeltaSummary {
    pub current_findings: usize,
    pub previous_findings: usize,
    pub new_count: usize,
    pub fixed_count: usize,
    pub host_count: Option<usize>,
    pub new_host_count: Option<usize>,
    pub disappeared_host_count: Option<usize>,
}

/// Compare two normalized collections. Header rows are ignored.
pub fn compare_snapshots(current: &[FindingRow], previous: &[FindingRow]) -> SnapshotDelta {
    let current_set: HashSet<&FindingRow> = findings(current).collect();
    let previous_set: HashSet<&FindingRow> = findings(previous).collect();

    let delta = SnapshotDelta {
        newly_added: difference(findings(current), &previous_set)
            .into_iter()
            .cloned()
            .collect(),
        newly_fixed: difference(findings(previous), &current_set)
            .into_iter()
            .cloned()
            .collect(),
    };

    tracing::debug!(
        current = current_set.len(),
        previous = previous_set.len(),
        new = delta.newly_added.len(),
        fixed = delta.newly_fixed.len(),
        "Snapshots compared"
    );
    delta
}

/// Compare the host inventories of two normalized collections.
///
/// Hosts are `(IP, FQDN, DNS names)` triples, so a host whose resolved
/// names changed shows up as both new and disappeared.
pub fn compare_hosts(current: &[FindingRow], previous: &[FindingRow]) -> HostDelta {
    let host_overview = distinct(findings(current).map(FindingRow::host));
    let previous_hosts = distinct(findings(previous).map(FindingRow::host));

    let (new_hosts, disappeared_hosts) = {
        let current_set: HashSet<&HostTriple> = host_overview.iter().collect();
        let previous_set: HashSet<&HostTriple> = previous_hosts.iter().collect();
        (
            difference(host_overview.iter(), &previous_set)
                .into_iter()
                .cloned()
                .collect(),
            difference(previous_hosts.iter(), &current_set)
                .into_iter()
                .cloned()
                .collect(),
        )
    };

    let delta = HostDelta {
        host_overview,
        new_hosts,
        disappeared_hosts,
    };

    tracing::debug!(
        hosts = delta.host_overview.len(),
        new_hosts = delta.new_hosts.len(),
        disappeared_hosts = delta.disappeared_hosts.len(),
        "Host inventories compared"
    );
    delta
}

impl DeltaSummary {
    pub fn new(
        current: &[FindingRow],
        previous: &[FindingRow],
        delta: &SnapshotDelta,
        hosts: Option<&HostDelta>,
    ) -> Self {
        Self {
            current_findings: findings(current).count(),
            previous_findings: findings(previous).count(),
            new_count: delta.newly_added.len(),
            fixed_count: delta.newly_fixed.len(),
            host_count: hosts.map(|h| h.host_overview.len()),
            new_host_count: hosts.map(|h| h.new_hosts.len()),
            disappeared_host_count: hosts.map(|h| h.disappeared_hosts.len()),
        }
    }
}

fn findings(rows: &[FindingRow]) -> impl Iterator<Item = &FindingRow> {
    rows.iter().filter(|r| !r.is_header())
}

/// Items of `left` missing from `right`, each at most once.
fn difference<T: Eq + Hash + Copy>(
    left: impl Iterator<Item = T>,
    right: &HashSet<T>,
) -> Vec<T> {
    let mut seen = HashSet::new();
    left.filter(|item| !right.contains(item) && seen.insert(*item))
        .collect()
}

fn distinct<T: Eq + Hash + Clone>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}
