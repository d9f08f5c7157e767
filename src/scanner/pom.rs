//! Maven POM descriptor reading.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use super::ScanError;
use crate::models::{Artifact, ArtifactBuilder, ArtifactError};

/// Coordinates one descriptor declares: its own, its parent's and its direct dependencies'.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub artifact: Artifact,
    pub parent: Option<Artifact>,
    pub dependencies: Vec<Artifact>,
}

impl Descriptor {
    /// Parent first, then dependencies in declaration order.
    pub fn declared(&self) -> impl Iterator<Item = &Artifact> {
        self.parent.iter().chain(self.dependencies.iter())
    }

    /// Own, parent and dependency coordinates.
    pub fn all(&self) -> impl Iterator<Item = &Artifact> {
        std::iter::once(&self.artifact).chain(self.declared())
    }
}

/// `pom.xml` in a source tree, or `<artifactId>-<version>.pom` in a local repository.
pub fn is_descriptor(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some("pom.xml") => true,
        Some(name) => name.ends_with(".pom"),
        None => false,
    }
}

#[derive(Debug, Default)]
struct RawCoordinate {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: String,
    kind: String,
}

impl RawCoordinate {
    fn set(&mut self, tag: &str, text: String) {
        match tag {
            "groupId" => self.group_id = text,
            "artifactId" => self.artifact_id = text,
            "version" => self.version = text,
            "classifier" => self.classifier = text,
            "type" | "packaging" => self.kind = text,
            _ => {}
        }
    }
}

#[derive(Debug, Default)]
struct RawPom {
    project: RawCoordinate,
    parent: Option<RawCoordinate>,
    properties: HashMap<String, String>,
    dependencies: Vec<RawCoordinate>,
}

fn read_raw(path: &Path, content: &str) -> Result<RawPom, ScanError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut raw = RawPom::default();
    let mut stack: Vec<String> = Vec::new();
    let mut current_dep: Option<RawCoordinate> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                stack.push(name);
                let at: Vec<&str> = stack.iter().map(String::as_str).collect();
                match at.as_slice() {
                    ["project", "parent"] => raw.parent = Some(RawCoordinate::default()),
                    ["project", "dependencies", "dependency"] => {
                        current_dep = Some(RawCoordinate::default())
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                let at: Vec<&str> = stack.iter().map(String::as_str).collect();
                if at.as_slice() == ["project", "dependencies", "dependency"] {
                    if let Some(dep) = current_dep.take() {
                        raw.dependencies.push(dep);
                    }
                }
                stack.pop();
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().trim().to_string();
                let at: Vec<&str> = stack.iter().map(String::as_str).collect();
                match at.as_slice() {
                    ["project", tag] => raw.project.set(tag, text),
                    ["project", "parent", tag] => {
                        if let Some(parent) = raw.parent.as_mut() {
                            parent.set(tag, text);
                        }
                    }
                    ["project", "properties", key] => {
                        raw.properties.insert(key.to_string(), text);
                    }
                    ["project", "dependencies", "dependency", tag] => {
                        if let Some(dep) = current_dep.as_mut() {
                            dep.set(tag, text);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ScanError::Xml {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(raw)
}

/// Substitutes `${name}` references that `values` knows; unknown ones stay verbatim.
fn interpolate(value: &str, values: &HashMap<String, String>) -> String {
    let mut out = value.to_string();
    // Properties may reference other properties; a few passes settle realistic chains.
    for _ in 0..5 {
        if !out.contains("${") {
            break;
        }
        let mut next = String::with_capacity(out.len());
        let mut rest = out.as_str();
        while let Some(start) = rest.find("${") {
            next.push_str(&rest[..start]);
            match rest[start..].find('}') {
                Some(len) => {
                    let key = &rest[start + 2..start + len];
                    match values.get(key) {
                        Some(v) => next.push_str(v),
                        None => next.push_str(&rest[start..=start + len]),
                    }
                    rest = &rest[start + len + 1..];
                }
                None => {
                    next.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        next.push_str(rest);
        if next == out {
            break;
        }
        out = next;
    }
    out
}

/// Read one descriptor into its coordinates.
///
/// Own groupId and version fall back to the parent's. Property references
/// resolvable within the same descriptor are substituted; the rest are kept
/// as placeholders for a later [`super::resolve::VersionIndex`] pass.
pub fn parse_pom(
    path: &Path,
    content: &str,
    builder: &mut ArtifactBuilder,
) -> Result<Descriptor, ScanError> {
    let raw = read_raw(path, content)?;

    let parent_group = raw.parent.as_ref().map(|p| p.group_id.clone()).unwrap_or_default();
    let parent_version = raw.parent.as_ref().map(|p| p.version.clone()).unwrap_or_default();

    let mut values = raw.properties.clone();
    let mut own_group = if raw.project.group_id.is_empty() {
        parent_group.clone()
    } else {
        raw.project.group_id.clone()
    };
    let mut own_version = if raw.project.version.is_empty() {
        parent_version.clone()
    } else {
        raw.project.version.clone()
    };

    for key in ["project.parent.version", "parent.version"] {
        values.insert(key.to_string(), parent_version.clone());
    }
    for key in ["project.parent.groupId", "parent.groupId"] {
        values.insert(key.to_string(), parent_group.clone());
    }
    own_group = interpolate(&own_group, &values);
    own_version = interpolate(&own_version, &values);
    for key in ["project.version", "pom.version", "version"] {
        values.insert(key.to_string(), own_version.clone());
    }
    for key in ["project.groupId", "pom.groupId", "groupId"] {
        values.insert(key.to_string(), own_group.clone());
    }
    for key in ["project.artifactId", "pom.artifactId", "artifactId"] {
        values.insert(key.to_string(), raw.project.artifact_id.clone());
    }

    let identity = |ArtifactError::MissingCoordinate(field)| ScanError::MissingIdentity {
        path: path.to_path_buf(),
        field,
    };

    let artifact = builder
        .build(
            &own_group,
            &raw.project.artifact_id,
            &own_version,
            None,
            Some(raw.project.kind.as_str()),
        )
        .map_err(identity)?;

    let parent = match &raw.parent {
        Some(p) => {
            let version = interpolate(&p.version, &values);
            match builder.build(&p.group_id, &p.artifact_id, &version, None, Some("pom")) {
                Ok(a) => Some(a),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "ignoring incomplete parent");
                    None
                }
            }
        }
        None => None,
    };

    let mut dependencies = Vec::with_capacity(raw.dependencies.len());
    for dep in &raw.dependencies {
        let built = builder.build(
            &interpolate(&dep.group_id, &values),
            &interpolate(&dep.artifact_id, &values),
            &interpolate(&dep.version, &values),
            Some(interpolate(&dep.classifier, &values).as_str()),
            Some(interpolate(&dep.kind, &values).as_str()),
        );
        match built {
            Ok(a) => dependencies.push(a),
            Err(e) => debug!(path = %path.display(), error = %e, "ignoring incomplete dependency"),
        }
    }

    Ok(Descriptor {
        artifact,
        parent,
        dependencies,
    })
}

/// Read and parse a descriptor file. The file is closed before parsing begins.
pub fn read_descriptor(path: &Path, builder: &mut ArtifactBuilder) -> Result<Descriptor, ScanError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pom(path, &content, builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Descriptor, ScanError> {
        parse_pom(Path::new("pom.xml"), xml, &mut ArtifactBuilder::new())
    }

    #[test]
    fn test_own_coordinates_and_dependencies() {
        let d = parse(
            r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>org.acme</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <packaging>war</packaging>
  <dependencies>
    <dependency>
      <groupId>org.foo</groupId>
      <artifactId>core</artifactId>
      <version>2.0</version>
    </dependency>
    <dependency>
      <groupId>org.foo</groupId>
      <artifactId>core</artifactId>
      <version>2.0</version>
      <classifier>tests</classifier>
      <type>test-jar</type>
    </dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();
        assert_eq!(d.artifact.to_string(), "org.acme:app:war::1.0");
        assert!(d.parent.is_none());
        assert_eq!(d.dependencies.len(), 2);
        assert_eq!(d.dependencies[0].to_string(), "org.foo:core:2.0");
        assert_eq!(d.dependencies[1].classifier(), "tests");
        assert_eq!(d.dependencies[1].kind(), "test-jar");
    }

    #[test]
    fn test_inherits_from_parent() {
        let d = parse(
            r#"<project>
  <parent>
    <groupId>org.acme</groupId>
    <artifactId>acme-parent</artifactId>
    <version>3.1</version>
    <relativePath/>
  </parent>
  <artifactId>module-a</artifactId>
  <dependencies>
    <dependency>
      <groupId>${project.groupId}</groupId>
      <artifactId>module-b</artifactId>
      <version>${project.version}</version>
    </dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();
        assert_eq!(d.artifact.gav(), "org.acme:module-a:3.1");
        assert_eq!(d.parent.as_ref().unwrap().gav(), "org.acme:acme-parent:3.1");
        assert_eq!(d.parent.as_ref().unwrap().kind(), "pom");
        assert_eq!(d.dependencies[0].gav(), "org.acme:module-b:3.1");
    }

    #[test]
    fn test_properties_and_placeholders() {
        let d = parse(
            r#"<project>
  <groupId>org.acme</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <properties>
    <foo.major>2</foo.major>
    <foo.version>${foo.major}.5</foo.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>org.foo</groupId>
      <artifactId>core</artifactId>
      <version>${foo.version}</version>
    </dependency>
    <dependency>
      <groupId>org.bar</groupId>
      <artifactId>managed</artifactId>
    </dependency>
    <dependency>
      <groupId>org.baz</groupId>
      <artifactId>external</artifactId>
      <version>${baz.version}</version>
    </dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();
        let versions: Vec<&str> = d.dependencies.iter().map(|a| a.version()).collect();
        assert_eq!(versions, vec!["2.5", "", "${baz.version}"]);
        assert!(d.dependencies[1].has_placeholder_version());
        assert!(d.dependencies[2].has_placeholder_version());
    }

    #[test]
    fn test_ignores_managed_and_plugin_dependencies() {
        let d = parse(
            r#"<project>
  <groupId>g</groupId><artifactId>a</artifactId><version>1</version>
  <dependencyManagement>
    <dependencies>
      <dependency><groupId>x</groupId><artifactId>managed</artifactId><version>1</version></dependency>
    </dependencies>
  </dependencyManagement>
  <build><plugins><plugin>
    <artifactId>maven-surefire-plugin</artifactId>
    <dependencies>
      <dependency><groupId>y</groupId><artifactId>plugin-dep</artifactId><version>1</version></dependency>
    </dependencies>
  </plugin></plugins></build>
</project>"#,
        )
        .unwrap();
        assert!(d.dependencies.is_empty());
        assert_eq!(d.artifact.version(), "1");
    }

    #[test]
    fn test_missing_identity() {
        let err = parse("<project><artifactId>orphan</artifactId></project>").unwrap_err();
        assert!(matches!(err, ScanError::MissingIdentity { field: "groupId", .. }));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse("<project><groupId>g</artifactId></project>").unwrap_err();
        assert!(matches!(err, ScanError::Xml { .. }));
    }

    #[test]
    fn test_is_descriptor() {
        assert!(is_descriptor(Path::new("a/b/pom.xml")));
        assert!(is_descriptor(Path::new("repo/org/foo/core/1.0/core-1.0.pom")));
        assert!(!is_descriptor(Path::new("a/b/build.gradle")));
        assert!(!is_descriptor(Path::new("a/pom.xml.bak")));
    }

    #[test]
    fn test_interpolate_leaves_unknown() {
        let mut values = HashMap::new();
        values.insert("a".to_string(), "1".to_string());
        assert_eq!(interpolate("${a}.${b}", &values), "1.${b}");
        assert_eq!(interpolate("${unterminated", &values), "${unterminated");
        assert_eq!(interpolate("plain", &values), "plain");
    }
}
