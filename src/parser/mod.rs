//! Line-oriented parsers that normalize textual artifact mentions into [`Artifact`] sets.
//!
//! Every variant implements [`ArtifactParser`]; callers pick one through [`Format`]
//! and feed it lines from any [`crate::source`]. Parsers never fail on noise:
//! unrecognized or malformed lines are skipped.

use std::collections::HashSet;

use anyhow::Result;
use tracing::debug;

use crate::models::{Artifact, ArtifactBuilder};

pub mod gaecv;
pub mod list;
pub mod missing_log;

pub trait ArtifactParser {
    fn parse(&self, lines: &[String], builder: &mut ArtifactBuilder) -> HashSet<Artifact>;
}

/// Textual convention of an input, chosen by the caller before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Build log with "could not find artifact"-style failures.
    MissingLog,
    /// Strict `g:a:extension:classifier:version` records.
    Gaecv,
    /// Lenient `g:a[:type][:classifier]:version` coordinates.
    List,
}

impl Format {
    pub fn parser(self) -> Result<Box<dyn ArtifactParser>> {
        Ok(match self {
            Format::MissingLog => Box::new(missing_log::MissingLogParser::new()?),
            Format::Gaecv => Box::new(gaecv::GaecvParser::new()),
            Format::List => Box::new(list::ListParser::new()),
        })
    }
}

const SCOPES: &[&str] = &["compile", "provided", "runtime", "test", "system", "import"];

/// Parse one `groupId:artifactId[:type][:classifier]:version` token.
///
/// Fields are positional: an empty type means `jar`, an empty classifier means
/// none and an empty version is kept as a placeholder. The six-field form
/// `g:a::type:classifier:version` carries one extra empty segment after the
/// artifact id, which is dropped. A trailing dependency scope (as printed by
/// `dependency:list`) is dropped too.
pub fn parse_coordinate(token: &str, builder: &mut ArtifactBuilder) -> Option<Artifact> {
    let token = token.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, ',' | ';' | '\'' | '"' | '(' | ')' | '[' | ']')
    });
    let parts: Vec<&str> = token.split(':').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }

    let mut rest = &parts[2..];
    if rest.len() >= 3 && rest.last().is_some_and(|s| SCOPES.contains(s)) {
        rest = &rest[..rest.len() - 1];
    }
    if rest.len() == 4 && rest[0].is_empty() {
        rest = &rest[1..];
    }

    let (kind, classifier, version) = match *rest {
        [version] => (None, None, version),
        [kind, version] => (Some(kind), None, version),
        [kind, classifier, version] => (Some(kind), Some(classifier), version),
        _ => return None,
    };

    match builder.build(parts[0], parts[1], version, classifier, kind) {
        Ok(artifact) => Some(artifact),
        Err(e) => {
            debug!(token, error = %e, "skipping malformed coordinate");
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn lines(input: &[&str]) -> Vec<String> {
    input.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate_shapes() {
        let mut b = ArtifactBuilder::new();

        let a = parse_coordinate("org.foo:core:1.0", &mut b).unwrap();
        assert_eq!((a.kind(), a.classifier(), a.version()), ("jar", "", "1.0"));

        let a = parse_coordinate("org.foo:core:pom:1.0", &mut b).unwrap();
        assert_eq!((a.kind(), a.classifier(), a.version()), ("pom", "", "1.0"));

        let a = parse_coordinate("org.foo:core:jar:sources:1.0,", &mut b).unwrap();
        assert_eq!(a.classifier(), "sources");
        assert_eq!(a.version(), "1.0");
    }

    #[test]
    fn test_parse_coordinate_is_positional() {
        let mut b = ArtifactBuilder::new();

        let a = parse_coordinate("org.example:mylib::tests:1.2.0", &mut b).unwrap();
        assert_eq!((a.kind(), a.classifier(), a.version()), ("jar", "tests", "1.2.0"));

        let a = parse_coordinate("org.example:other:jar:tests:", &mut b).unwrap();
        assert_eq!((a.kind(), a.classifier(), a.version()), ("jar", "tests", ""));
        assert!(a.has_placeholder_version());

        let a = parse_coordinate("org.example:mylib::war:tests:1.2.0", &mut b).unwrap();
        assert_eq!((a.kind(), a.classifier(), a.version()), ("war", "tests", "1.2.0"));
    }

    #[test]
    fn test_parse_coordinate_drops_scope() {
        let mut b = ArtifactBuilder::new();
        let a = parse_coordinate("junit:junit:jar:4.13.2:test", &mut b).unwrap();
        assert_eq!(a.version(), "4.13.2");
        assert_eq!(a.classifier(), "");
    }

    #[test]
    fn test_parse_coordinate_rejects_garbage() {
        let mut b = ArtifactBuilder::new();
        assert!(parse_coordinate("not-a-coordinate", &mut b).is_none());
        assert!(parse_coordinate(":core:1.0", &mut b).is_none());
        assert!(parse_coordinate("g:a:b:c:d:e", &mut b).is_none());
    }

    #[test]
    fn test_every_format_is_idempotent() {
        let input = lines(&[
            "Could not find artifact org.foo:core:jar:2.1 in central",
            "org.foo:core:jar::2.1",
            "org.example:mylib:jar:tests:1.2.0",
            "[INFO]    junit:junit:jar:4.13.2:test",
        ]);
        for format in [Format::MissingLog, Format::Gaecv, Format::List] {
            let parser = format.parser().unwrap();
            let mut b = ArtifactBuilder::new();
            let first = parser.parse(&input, &mut b);
            let second = parser.parse(&input, &mut b);
            assert!(!first.is_empty(), "{format:?} recognized nothing");
            assert_eq!(first, second, "{format:?}");
        }
    }

    #[test]
    fn test_every_format_tolerates_garbage() {
        let garbage = lines(&["", "   ", "hello world", "[INFO] BUILD SUCCESS"]);
        for format in [Format::MissingLog, Format::Gaecv, Format::List] {
            let parser = format.parser().unwrap();
            let mut b = ArtifactBuilder::new();
            assert!(parser.parse(&[], &mut b).is_empty());
            assert!(parser.parse(&garbage, &mut b).is_empty());
        }
    }
}
