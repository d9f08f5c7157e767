//! Renderers for scan and parse results.
//!
//! - plain listings and the dependency map live here; they are line oriented
//!   and meant to be piped into other tools.
//! - [`terminal`] — colored tables for grouped reports and cross-universe comparisons.

use std::collections::BTreeMap;

use crate::models::Artifact;

pub mod terminal;

/// One canonical coordinate per line, in natural artifact order, duplicates removed.
pub fn artifact_lines<'a>(artifacts: impl IntoIterator<Item = &'a Artifact>) -> Vec<String> {
    let mut sorted: Vec<&Artifact> = artifacts.into_iter().collect();
    sorted.sort();
    sorted.dedup();
    sorted.iter().map(ToString::to_string).collect()
}

/// `groupId:artifactId:version` per line, as produced by a repository listing.
pub fn gav_lines<'a>(artifacts: impl IntoIterator<Item = &'a Artifact>) -> Vec<String> {
    let mut lines: Vec<String> = artifacts.into_iter().map(Artifact::gav).collect();
    lines.sort();
    lines.dedup();
    lines
}

/// `project: dep1 dep2` per line; both levels already sorted by the map.
pub fn dependency_lines(map: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    map.iter()
        .map(|(name, deps)| {
            if deps.is_empty() {
                format!("{name}:")
            } else {
                format!("{name}: {}", deps.join(" "))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArtifactBuilder;

    #[test]
    fn test_artifact_lines_sorted_and_distinct() {
        let mut b = ArtifactBuilder::new();
        let a = b.gav("org.b", "x", "1").unwrap();
        let c = b.build("org.a", "y", "1", Some("tests"), None).unwrap();
        let lines = artifact_lines([&a, &c, &a]);
        assert_eq!(lines, vec!["org.a:y:jar:tests:1", "org.b:x:1"]);
    }

    #[test]
    fn test_gav_lines() {
        let mut b = ArtifactBuilder::new();
        let a = b.build("g", "a", "1", None, Some("pom")).unwrap();
        let c = b.gav("g", "a", "1").unwrap();
        assert_eq!(gav_lines([&a, &c]), vec!["g:a:1"]);
    }

    #[test]
    fn test_dependency_lines() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), vec!["a".to_string(), "c".to_string()]);
        map.insert("a".to_string(), vec![]);
        assert_eq!(dependency_lines(&map), vec!["a:", "b: a c"]);
    }
}
