use std::collections::HashMap;

use crate::models::{Artifact, ArtifactBuilder};

use super::pom::Descriptor;
use super::Located;

/// Concrete versions known for each `groupId:artifactId` in a scanned tree.
///
/// Built after a full scan, then consulted to replace placeholder versions.
/// When a tree holds several concrete versions of one key, the greatest by
/// string order is used.
#[derive(Debug, Default)]
pub struct VersionIndex {
    versions: HashMap<String, String>,
}

impl VersionIndex {
    pub fn from_artifacts<'a>(artifacts: impl IntoIterator<Item = &'a Artifact>) -> Self {
        let mut versions: HashMap<String, String> = HashMap::new();
        for a in artifacts {
            if a.has_placeholder_version() {
                continue;
            }
            versions
                .entry(a.ga())
                .and_modify(|v| {
                    if a.version() > v.as_str() {
                        *v = a.version().to_string();
                    }
                })
                .or_insert_with(|| a.version().to_string());
        }
        Self { versions }
    }

    /// Index every coordinate (own, parent and dependency) of scanned descriptors.
    pub fn from_located(located: &[Located]) -> Self {
        Self::from_artifacts(located.iter().flat_map(|l| l.descriptor.all()))
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn version_of(&self, ga: &str) -> Option<&str> {
        self.versions.get(ga).map(String::as_str)
    }

    /// A copy with a concrete version, or the artifact unchanged when it
    /// already has one or the key is unknown.
    pub fn resolve(&self, artifact: &Artifact, builder: &mut ArtifactBuilder) -> Artifact {
        if !artifact.has_placeholder_version() {
            return artifact.clone();
        }
        match self.version_of(&artifact.ga()) {
            Some(version) => builder.with_version(artifact, version),
            None => artifact.clone(),
        }
    }

    pub fn resolve_descriptor(&self, d: &Descriptor, builder: &mut ArtifactBuilder) -> Descriptor {
        Descriptor {
            artifact: self.resolve(&d.artifact, builder),
            parent: d.parent.as_ref().map(|p| self.resolve(p, builder)),
            dependencies: d
                .dependencies
                .iter()
                .map(|a| self.resolve(a, builder))
                .collect(),
        }
    }
}
