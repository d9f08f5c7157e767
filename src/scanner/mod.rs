//! Discovery of artifact coordinates from project descriptors on disk.
//!
//! A scan is two-phase: [`Scanner::scan_descriptors`] walks a tree and reads
//! every descriptor, then an optional [`VersionIndex`] built from a second tree
//! replaces placeholder versions.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::{Artifact, ArtifactBuilder};

pub mod pom;
pub mod resolve;

pub use pom::Descriptor;
pub use resolve::VersionIndex;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed descriptor {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    #[error("{} does not declare {field}", path.display())]
    MissingIdentity { path: PathBuf, field: &'static str },
}

/// A descriptor and the file it was read from.
#[derive(Debug, Clone)]
pub struct Located {
    pub path: PathBuf,
    pub descriptor: Descriptor,
}

/// Walks directory trees for descriptor files, pruning configured paths.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    skip_paths: Vec<String>,
}

impl Scanner {
    pub fn new(skip_paths: Vec<String>) -> Self {
        Self { skip_paths }
    }

    /// True when the full path contains a skip substring.
    ///
    /// The absolute path is matched with `/` separators and a trailing `/`, so
    /// `"/target/"` prunes a `target` directory at any depth, including a scan
    /// root that itself sits below one.
    pub fn is_skipped(&self, path: &Path) -> bool {
        let full = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let full = full.to_string_lossy().replace('\\', "/");
        let probe = format!("{}/", full.trim_end_matches('/'));
        self.skip_paths.iter().any(|s| probe.contains(s.as_str()))
    }

    /// Read every descriptor under `root`. Unreadable or incomplete descriptors are skipped.
    pub fn scan_descriptors(&self, root: &Path, builder: &mut ArtifactBuilder) -> Vec<Located> {
        let mut found = Vec::new();
        let mut skipped = 0usize;

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_skipped(e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable path");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !pom::is_descriptor(entry.path()) {
                continue;
            }

            match pom::read_descriptor(entry.path(), builder) {
                Ok(descriptor) => found.push(Located {
                    path: entry.path().to_path_buf(),
                    descriptor,
                }),
                Err(e @ ScanError::MissingIdentity { .. }) => {
                    debug!(error = %e, "skipping descriptor");
                    skipped += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping descriptor");
                    skipped += 1;
                }
            }
        }

        info!(
            root = %root.display(),
            descriptors = found.len(),
            skipped,
            "scan complete"
        );
        found
    }

    /// Every coordinate mentioned under `root` (own, parent and dependency),
    /// with placeholder versions resolved against `resolution` when given.
    pub fn scan_tree(
        &self,
        root: &Path,
        resolution: Option<&VersionIndex>,
        builder: &mut ArtifactBuilder,
    ) -> Vec<Artifact> {
        let located = self.scan_descriptors(root, builder);
        let located = match resolution {
            Some(index) => resolve_all(&located, index, builder),
            None => located,
        };
        flatten(&located)
    }
}

pub fn resolve_all(
    located: &[Located],
    index: &VersionIndex,
    builder: &mut ArtifactBuilder,
) -> Vec<Located> {
    located
        .iter()
        .map(|l| Located {
            path: l.path.clone(),
            descriptor: index.resolve_descriptor(&l.descriptor, builder),
        })
        .collect()
}

pub fn flatten(located: &[Located]) -> Vec<Artifact> {
    located
        .iter()
        .flat_map(|l| l.descriptor.all().cloned())
        .collect()
}

#[cfg(test)]
pub(crate) fn write_pom(dir: &Path, gav: (&str, &str, &str), deps: &[(&str, &str, &str)]) {
    std::fs::create_dir_all(dir).unwrap();
    let deps: String = deps
        .iter()
        .map(|(g, a, v)| {
            format!(
                "<dependency><groupId>{g}</groupId><artifactId>{a}</artifactId><version>{v}</version></dependency>"
            )
        })
        .collect();
    let xml = format!(
        "<project><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version><dependencies>{}</dependencies></project>",
        gav.0, gav.1, gav.2, deps
    );
    std::fs::write(dir.join("pom.xml"), xml).unwrap();
}
