use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::models::{Artifact, ArtifactBuilder};
use crate::scanner::Scanner;

/// A directory-rooted module: what it produces and what it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    /// Coordinates of descriptors found under the project directory.
    artifacts: BTreeSet<Artifact>,
    /// Parent and dependency coordinates those descriptors declare.
    declared: BTreeSet<Artifact>,
    /// Names of other projects producing a declared coordinate.
    /// Empty until [`Project::resolve_dependencies`] runs.
    dependencies: BTreeSet<String>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        artifacts: impl IntoIterator<Item = Artifact>,
        declared: impl IntoIterator<Item = Artifact>,
    ) -> Self {
        Self {
            name: name.into(),
            artifacts: artifacts.into_iter().collect(),
            declared: declared.into_iter().collect(),
            dependencies: BTreeSet::new(),
        }
    }

    /// Scan one project directory; the name is the directory's base name.
    pub fn scan(root: &Path, scanner: &Scanner, builder: &mut ArtifactBuilder) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        let located = scanner.scan_descriptors(root, builder);
        Self::new(
            name,
            located.iter().map(|l| l.descriptor.artifact.clone()),
            located.iter().flat_map(|l| l.descriptor.declared().cloned()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artifacts(&self) -> &BTreeSet<Artifact> {
        &self.artifacts
    }

    pub fn declared(&self) -> &BTreeSet<Artifact> {
        &self.declared
    }

    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    fn produces(&self, wanted: &Artifact) -> bool {
        self.artifacts.iter().any(|a| a.same_ga(wanted))
    }

    /// Names of projects in `all` that produce one of this project's declared
    /// coordinates, matched on groupId and artifactId only.
    ///
    /// Coordinates no project produces are external and contribute nothing.
    /// This project itself is never included.
    pub fn find_dependencies(&self, all: &[Project]) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for wanted in &self.declared {
            let owners: Vec<&str> = all
                .iter()
                .filter(|p| p.name != self.name && p.produces(wanted))
                .map(|p| p.name.as_str())
                .collect();
            if owners.is_empty() {
                debug!(project = %self.name, artifact = %wanted, "external dependency");
            }
            names.extend(owners.into_iter().map(str::to_string));
        }
        names
    }

    /// Replace the dependency set with the edges found in `all`.
    pub fn resolve_dependencies(&mut self, all: &[Project]) {
        self.dependencies = self.find_dependencies(all);
    }
}

impl PartialOrd for Project {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Project {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.artifacts.cmp(&other.artifacts))
            .then_with(|| self.declared.cmp(&other.declared))
            .then_with(|| self.dependencies.cmp(&other.dependencies))
    }
}

/// Resolve every project against the full universe.
///
/// Each project resolves against a snapshot taken before any is updated,
/// so the outcome does not depend on slice order.
pub fn resolve_all(projects: &mut [Project]) {
    let snapshot = projects.to_vec();
    for project in projects.iter_mut() {
        project.resolve_dependencies(&snapshot);
    }
}

/// One project per immediate subdirectory of `sources`, resolved against each other.
pub fn scan_projects(
    sources: &Path,
    scanner: &Scanner,
    builder: &mut ArtifactBuilder,
) -> std::io::Result<Vec<Project>> {
    let mut roots: Vec<_> = std::fs::read_dir(sources)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir() && !scanner.is_skipped(p))
        .collect();
    roots.sort();

    let mut projects: Vec<Project> = roots
        .iter()
        .map(|root| Project::scan(root, scanner, builder))
        .collect();
    resolve_all(&mut projects);
    projects.sort();
    for p in &projects {
        debug!(
            project = p.name(),
            artifacts = p.artifacts().len(),
            declared = p.declared().len(),
            dependencies = p.dependencies().len(),
            "project resolved"
        );
    }
    Ok(projects)
}

/// `name -> sorted dependency names`, ordered by project name.
pub fn dependency_map(projects: &[Project]) -> BTreeMap<String, Vec<String>> {
    projects
        .iter()
        .map(|p| (p.name().to_string(), p.dependencies().iter().cloned().collect()))
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("dependency cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Visited,
}

/// Project names ordered so every project follows the projects it depends on.
///
/// Depth-first with visiting/visited marks; ties are broken by name. A back
/// edge is reported as [`GraphError::Cycle`] with the offending path, first
/// node repeated at the end.
pub fn build_order(projects: &[Project]) -> Result<Vec<String>, GraphError> {
    let graph = dependency_map(projects);
    let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
    let mut order = Vec::with_capacity(graph.len());
    let mut stack: Vec<&str> = Vec::new();

    fn visit<'a>(
        node: &'a str,
        graph: &'a BTreeMap<String, Vec<String>>,
        marks: &mut BTreeMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
        order: &mut Vec<String>,
    ) -> Result<(), GraphError> {
        match marks.get(node) {
            Some(Mark::Visited) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|n| *n == node).unwrap_or(0);
                let mut path: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
                path.push(node.to_string());
                return Err(GraphError::Cycle { path });
            }
            None => {}
        }

        marks.insert(node, Mark::Visiting);
        stack.push(node);
        if let Some(deps) = graph.get(node) {
            for dep in deps {
                visit(dep, graph, marks, stack, order)?;
            }
        }
        stack.pop();
        marks.insert(node, Mark::Visited);
        order.push(node.to_string());
        Ok(())
    }

    for node in graph.keys() {
        visit(node, &graph, &mut marks, &mut stack, &mut order)?;
    }
    Ok(order)
}
