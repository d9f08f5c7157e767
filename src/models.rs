use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// Packaging type assumed when a coordinate does not name one.
pub const DEFAULT_TYPE: &str = "jar";

/// A build output identified by its Maven-style coordinates.
///
/// Equality, hashing and ordering all derive from the same field tuple
/// `(group_id, artifact_id, version, classifier, kind)`, in that priority.
/// Fields are shared strings so that clones handed out by an
/// [`ArtifactBuilder`] point at the same allocations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Artifact {
    group_id: Arc<str>,
    artifact_id: Arc<str>,
    version: Arc<str>,
    classifier: Arc<str>,
    #[serde(rename = "type")]
    kind: Arc<str>,
}

impl Artifact {
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    /// Packaging type / file extension (`jar`, `pom`, `war`, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// `groupId:artifactId`, the key used for grouping and project matching.
    pub fn ga(&self) -> String {
        format!("{}:{}", self.group_id(), self.artifact_id())
    }

    /// Same group and artifact id, regardless of version, classifier or type.
    pub fn same_ga(&self, other: &Artifact) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }

    /// True when the version is empty or still carries a `${...}` property reference.
    pub fn has_placeholder_version(&self) -> bool {
        is_placeholder(&self.version)
    }

    /// Short `groupId:artifactId:version` rendering.
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group_id(), self.artifact_id(), self.version())
    }
}

/// Canonical form: `g:a:v` for plain jars, otherwise `g:a:type:classifier:v`.
impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.classifier().is_empty() && self.kind() == DEFAULT_TYPE {
            f.write_str(&self.gav())
        } else {
            write!(
                f,
                "{}:{}:{}:{}:{}",
                self.group_id(),
                self.artifact_id(),
                self.kind(),
                self.classifier(),
                self.version()
            )
        }
    }
}

pub fn is_placeholder(version: &str) -> bool {
    version.trim().is_empty() || version.contains("${")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("missing mandatory coordinate: {0}")]
    MissingCoordinate(&'static str),
}

/// Single construction point for [`Artifact`] values.
///
/// Coordinate strings are interned, so the thousands of repeated mentions a
/// large build log produces share one allocation per distinct string. The pool
/// belongs to the builder instance; independent builders never share state.
#[derive(Debug, Default)]
pub struct ArtifactBuilder {
    pool: HashSet<Arc<str>>,
}

impl ArtifactBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an artifact from trimmed coordinates.
    ///
    /// An empty `classifier` means none; an empty or absent `kind` falls back
    /// to [`DEFAULT_TYPE`]. A missing version is kept as an empty placeholder.
    pub fn build(
        &mut self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        classifier: Option<&str>,
        kind: Option<&str>,
    ) -> Result<Artifact, ArtifactError> {
        let group_id = group_id.trim();
        let artifact_id = artifact_id.trim();
        if group_id.is_empty() {
            return Err(ArtifactError::MissingCoordinate("groupId"));
        }
        if artifact_id.is_empty() {
            return Err(ArtifactError::MissingCoordinate("artifactId"));
        }

        let kind = match kind.map(str::trim) {
            Some(k) if !k.is_empty() => k,
            _ => DEFAULT_TYPE,
        };

        Ok(Artifact {
            group_id: self.intern(group_id),
            artifact_id: self.intern(artifact_id),
            version: self.intern(version.trim()),
            classifier: self.intern(classifier.unwrap_or("").trim()),
            kind: self.intern(kind),
        })
    }

    /// Shorthand for a plain `groupId:artifactId:version` jar.
    #[cfg(test)]
    pub fn gav(
        &mut self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<Artifact, ArtifactError> {
        self.build(group_id, artifact_id, version, None, None)
    }

    /// A copy of `artifact` carrying `version`; the original is untouched.
    pub fn with_version(&mut self, artifact: &Artifact, version: &str) -> Artifact {
        Artifact {
            version: self.intern(version.trim()),
            ..artifact.clone()
        }
    }

    /// Number of distinct coordinate strings held by this builder.
    pub fn interned(&self) -> usize {
        self.pool.len()
    }

    fn intern(&mut self, value: &str) -> Arc<str> {
        if let Some(existing) = self.pool.get(value) {
            return Arc::clone(existing);
        }
        let shared: Arc<str> = Arc::from(value);
        self.pool.insert(Arc::clone(&shared));
        shared
    }
}
