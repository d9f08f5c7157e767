use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::models::{Artifact, ArtifactBuilder};

/// Parser for Maven build logs that reports artifacts the build failed to obtain.
///
/// Recognized markers:
/// - `Could not find artifact <coord>`
/// - `Failure to find <coord>`
/// - `Missing artifact <coord>`
/// - `Could not transfer artifact <coord>`
/// - `The POM for <coord> is missing`
/// - `The following artifacts could not be resolved: <coord>, <coord>: ...`
pub struct MissingLogParser {
    single: Regex,
    pom_missing: Regex,
    listed: Regex,
}

impl MissingLogParser {
    pub fn new() -> Result<Self> {
        let single = Regex::new(
            r"(?i)(?:could not find artifact|failure to find|missing artifact|could not transfer artifact)\s+([^\s,]+)",
        )?;
        // "The POM for X is invalid" also exists and names a present artifact.
        let pom_missing = Regex::new(r"(?i)the pom for\s+([^\s,]+)\s+is missing")?;
        let listed = Regex::new(r"(?i)artifacts could not be resolved:\s*(.+)")?;
        Ok(Self {
            single,
            pom_missing,
            listed,
        })
    }
}

impl super::ArtifactParser for MissingLogParser {
    fn parse(&self, lines: &[String], builder: &mut ArtifactBuilder) -> HashSet<Artifact> {
        let mut artifacts = HashSet::new();

        for line in lines {
            let marked = self
                .single
                .captures_iter(line)
                .chain(self.pom_missing.captures_iter(line));
            for caps in marked {
                if let Some(a) = super::parse_coordinate(&caps[1], builder) {
                    artifacts.insert(a);
                }
            }

            if let Some(caps) = self.listed.captures(line) {
                // The list ends at the first ": " that starts the failure reason.
                let listed = caps[1].split(": ").next().unwrap_or_default();
                for token in listed.split(',') {
                    match super::parse_coordinate(token, builder) {
                        Some(a) => {
                            artifacts.insert(a);
                        }
                        None => debug!(token, "ignoring unresolvable list entry"),
                    }
                }
            }
        }

        artifacts
    }
}
