use std::collections::HashSet;

use tracing::debug;

use crate::models::{Artifact, ArtifactBuilder};

/// Parser for `groupId:artifactId:extension:classifier:version` records.
///
/// Exactly five fields per line; classifier and extension may be empty.
/// Lines with any other field count are skipped.
pub struct GaecvParser {
    delimiter: char,
}

impl GaecvParser {
    pub fn new() -> Self {
        Self { delimiter: ':' }
    }

    #[cfg(test)]
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl super::ArtifactParser for GaecvParser {
    fn parse(&self, lines: &[String], builder: &mut ArtifactBuilder) -> HashSet<Artifact> {
        let mut artifacts = HashSet::new();

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(self.delimiter).collect();
            let &[group, artifact, extension, classifier, version] = fields.as_slice() else {
                debug!(line, "skipping record without five fields");
                continue;
            };
            match builder.build(group, artifact, version, Some(classifier), Some(extension)) {
                Ok(a) => {
                    artifacts.insert(a);
                }
                Err(e) => debug!(line, error = %e, "skipping malformed record"),
            }
        }

        artifacts
    }
}
