//! Grouping of artifact universes by `groupId:artifactId` for comparison reports.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::Artifact;

/// Artifacts bucketed by `groupId:artifactId`, keys and buckets in natural order.
pub type Grouped = BTreeMap<String, BTreeSet<Artifact>>;

pub fn group_by_ga<'a>(artifacts: impl IntoIterator<Item = &'a Artifact>) -> Grouped {
    let mut grouped = Grouped::new();
    for a in artifacts {
        grouped.entry(a.ga()).or_default().insert(a.clone());
    }
    grouped
}

/// Distinct versions present in one bucket.
pub fn versions(bucket: &BTreeSet<Artifact>) -> BTreeSet<&str> {
    bucket.iter().map(Artifact::version).collect()
}

/// Keys carrying at least `min` distinct versions.
pub fn version_conflicts(grouped: &Grouped, min: usize) -> Vec<&str> {
    grouped
        .iter()
        .filter(|(_, bucket)| versions(bucket).len() >= min.max(1))
        .map(|(key, _)| key.as_str())
        .collect()
}

/// How one `groupId:artifactId` key differs between two universes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDiff {
    pub key: String,
    pub only_left: Vec<Artifact>,
    pub only_right: Vec<Artifact>,
    pub common: Vec<Artifact>,
}

impl GroupDiff {
    pub fn is_identical(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty()
    }
}

/// Compare two grouped universes key by key, in key order.
///
/// Keys present on one side only appear with an empty opposite side.
/// Identical keys are dropped unless `include_identical` is set.
pub fn compare_grouped(left: &Grouped, right: &Grouped, include_identical: bool) -> Vec<GroupDiff> {
    let empty = BTreeSet::new();
    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();

    keys.into_iter()
        .map(|key| {
            let l = left.get(key).unwrap_or(&empty);
            let r = right.get(key).unwrap_or(&empty);
            GroupDiff {
                key: key.clone(),
                only_left: l.difference(r).cloned().collect(),
                only_right: r.difference(l).cloned().collect(),
                common: l.intersection(r).cloned().collect(),
            }
        })
        .filter(|d| include_identical || !d.is_identical())
        .collect()
}
