use std::collections::HashSet;

use tracing::debug;

use crate::models::{Artifact, ArtifactBuilder};

/// Parser for plain artifact lists, one `g:a[:type][:classifier]:version` per line.
///
/// Tolerates log prefixes such as `[INFO]` and `dependency:list` scope suffixes;
/// `#` starts a comment line.
pub struct ListParser;

impl ListParser {
    pub fn new() -> Self {
        Self
    }
}

impl super::ArtifactParser for ListParser {
    fn parse(&self, lines: &[String], builder: &mut ArtifactBuilder) -> HashSet<Artifact> {
        let mut artifacts = HashSet::new();

        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(token) = line.split_whitespace().find(|t| t.contains(':')) else {
                continue;
            };
            match super::parse_coordinate(token, builder) {
                Some(a) => {
                    artifacts.insert(a);
                }
                None => debug!(line, "skipping unparsable list entry"),
            }
        }

        artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{lines, ArtifactParser};

    #[test]
    fn test_classifier_variants() {
        let mut b = ArtifactBuilder::new();
        let set = ListParser::new().parse(
            &lines(&[
                "org.example:mylib:jar:tests:1.2.0",
                "org.example:mylib::jar:tests:1.2.0",
            ]),
            &mut b,
        );
        assert_eq!(set.len(), 1);
        let a = set.into_iter().next().unwrap();
        assert_eq!(a.classifier(), "tests");
        assert_eq!(a.kind(), "jar");
        assert_eq!(a.version(), "1.2.0");
    }

    #[test]
    fn test_empty_fields_keep_their_position() {
        let mut b = ArtifactBuilder::new();
        let set = ListParser::new().parse(
            &lines(&["org.example:mylib::tests:1.2.0", "org.example:other:jar:tests:"]),
            &mut b,
        );
        type Row = (String, String, String, String);
        let mut got: Vec<Row> = set
            .iter()
            .map(|a| {
                (
                    a.artifact_id().to_string(),
                    a.kind().to_string(),
                    a.classifier().to_string(),
                    a.version().to_string(),
                )
            })
            .collect();
        got.sort();
        let row = |a: &str, k: &str, c: &str, v: &str| -> Row {
            (a.into(), k.into(), c.into(), v.into())
        };
        assert_eq!(
            got,
            vec![
                row("mylib", "jar", "tests", "1.2.0"),
                row("other", "jar", "tests", ""),
            ]
        );
    }

    #[test]
    fn test_optional_classifier() {
        let mut b = ArtifactBuilder::new();
        let set = ListParser::new().parse(&lines(&["org.example:mylib:war:1.0"]), &mut b);
        let a = set.into_iter().next().unwrap();
        assert_eq!(a.kind(), "war");
        assert_eq!(a.classifier(), "");
    }

    #[test]
    fn test_noise_is_skipped() {
        let mut b = ArtifactBuilder::new();
        let input = lines(&[
            "# generated list",
            "[INFO]    org.foo:core:jar:1.0:compile",
            ":missing-group:jar:1.0",
            "just text",
            "org.foo:api:2.0",
        ]);
        let set = ListParser::new().parse(&input, &mut b);
        let mut rendered: Vec<String> = set.iter().map(ToString::to_string).collect();
        rendered.sort();
        assert_eq!(rendered, vec!["org.foo:api:2.0", "org.foo:core:1.0"]);
    }
}
