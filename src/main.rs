//! `artifact-analyzer` — inventory build artifacts and reconcile them into dependency maps.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise [`logging`].
//! 2. Load config ([`config::load_config`]); `--skip` overrides the configured prune list.
//! 3. Run the command:
//!    - `missing` / `build-gavs` / `join` — obtain lines ([`source`]) and run a [`parser`].
//!    - `list` — walk a tree for descriptors ([`scanner`]).
//!    - `makefile` — one [`project::Project`] per source directory, resolved into a dependency map.
//!    - `analyze` — group repository and source coordinates ([`sorter`]) and compare them.
//! 4. Render ([`report`]) as plain lines/tables or JSON.

mod cli;
mod config;
mod logging;
mod models;
mod parser;
mod project;
mod report;
mod scanner;
mod sorter;
mod source;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use serde_json::json;
use tracing::{debug, warn};

use cli::{Cli, Command, LogInput, OutputFormat};
use config::{load_config, Config};
use models::{Artifact, ArtifactBuilder};
use parser::Format;
use scanner::{Scanner, VersionIndex};
use source::download::{split_jobs, LogDownloader, JOB_PLACEHOLDER};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if !cli.skip.is_empty() {
        config.scan.skip_paths = cli.skip.clone();
    }

    let scanner = Scanner::new(config.scan.skip_paths.clone());
    let mut builder = ArtifactBuilder::new();

    match &cli.command {
        Command::Missing(input) => {
            let lines = load_lines(input, &config, cli.quiet).await?;
            let artifacts = Format::MissingLog.parser()?.parse(&lines, &mut builder);
            print_artifacts(&artifacts, cli.format)?;
        }
        Command::BuildGavs(input) => {
            let lines = load_lines(input, &config, cli.quiet).await?;
            let artifacts = Format::Gaecv.parser()?.parse(&lines, &mut builder);
            print_artifacts(&artifacts, cli.format)?;
        }
        Command::Join { lists } => {
            let parser = Format::List.parser()?;
            let mut artifacts = HashSet::new();
            let mut read = 0usize;
            for list in lists {
                match source::file::read_lines(list) {
                    Ok(lines) => {
                        artifacts.extend(parser.parse(&lines, &mut builder));
                        read += 1;
                    }
                    Err(e) => warn!(error = %e, "skipping list"),
                }
            }
            if read == 0 {
                bail!("none of the {} list file(s) could be read", lists.len());
            }
            print_artifacts(&artifacts, cli.format)?;
        }
        Command::List { repo } => {
            require_dir(repo, "repository root")?;
            let artifacts = scanner.scan_tree(repo, None, &mut builder);
            status(cli.quiet, &format!("{} coordinates under {}", artifacts.len(), repo.display()));
            match cli.format {
                OutputFormat::Terminal => {
                    for line in report::gav_lines(&artifacts) {
                        println!("{line}");
                    }
                }
                OutputFormat::Json => {
                    let distinct: HashSet<Artifact> = artifacts.into_iter().collect();
                    print_artifacts(&distinct, cli.format)?;
                }
            }
        }
        Command::Makefile { sources, order } => {
            require_dir(sources, "sources root")?;
            let projects = project::scan_projects(sources, &scanner, &mut builder)
                .with_context(|| format!("failed to list {}", sources.display()))?;
            status(cli.quiet, &format!("{} projects under {}", projects.len(), sources.display()));

            let map = project::dependency_map(&projects);
            let build_order = if *order {
                Some(project::build_order(&projects)?)
            } else {
                None
            };

            match cli.format {
                OutputFormat::Terminal => {
                    println!("Makefile dependency map:");
                    for line in report::dependency_lines(&map) {
                        println!("{line}");
                    }
                    if let Some(build_order) = build_order {
                        println!("\nBuild order:");
                        for name in build_order {
                            println!("{name}");
                        }
                    }
                }
                OutputFormat::Json => {
                    let out = json!({ "dependencies": map, "order": build_order });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
            }
        }
        Command::Analyze {
            sources,
            repo,
            min_versions,
        } => {
            if sources.is_none() && repo.is_none() {
                bail!("specify at least one of --sources or --repo");
            }
            let min_versions = min_versions.unwrap_or(config.report.min_versions);
            analyze(
                sources.as_deref(),
                repo.as_deref(),
                min_versions,
                &scanner,
                &mut builder,
                &cli,
            )?;
        }
    }

    debug!(interned = builder.interned(), "coordinate strings interned");
    Ok(())
}

fn analyze(
    sources: Option<&Path>,
    repo: Option<&Path>,
    min_versions: usize,
    scanner: &Scanner,
    builder: &mut ArtifactBuilder,
    cli: &Cli,
) -> Result<()> {
    let mut index: Option<VersionIndex> = None;

    // The repository resolves its own placeholders, then serves as the
    // resolution root for the sources.
    let repo_grouped = match repo {
        Some(repo) => {
            require_dir(repo, "repository root")?;
            status(cli.quiet, &format!("Analyzing repo: {}", repo.display()));
            let located = scanner.scan_descriptors(repo, builder);
            let repo_index = VersionIndex::from_located(&located);
            if repo_index.is_empty() {
                warn!(root = %repo.display(), "repository holds no concrete versions");
            }
            debug!(keys = repo_index.len(), "repository version index built");
            let artifacts = scanner::flatten(&scanner::resolve_all(&located, &repo_index, builder));
            index = Some(repo_index);
            Some(sorter::group_by_ga(&artifacts))
        }
        None => None,
    };

    let source_grouped = match sources {
        Some(sources) => {
            require_dir(sources, "sources root")?;
            status(cli.quiet, &format!("Analyzing sources: {}", sources.display()));
            let artifacts = scanner.scan_tree(sources, index.as_ref(), builder);
            let unresolved = artifacts.iter().filter(|a| a.has_placeholder_version()).count();
            if unresolved > 0 {
                warn!(unresolved, "coordinates kept placeholder versions");
            }
            Some(sorter::group_by_ga(&artifacts))
        }
        None => None,
    };

    let comparison = match (&repo_grouped, &source_grouped) {
        (Some(r), Some(s)) => Some(sorter::compare_grouped(r, s, false)),
        _ => None,
    };

    match cli.format {
        OutputFormat::Terminal => {
            if let Some(grouped) = &repo_grouped {
                report::terminal::render_grouped(
                    "M2 WORKING REPO ANALYZE (artifacts downloaded & installed during build)",
                    grouped,
                    min_versions,
                );
            }
            if let Some(grouped) = &source_grouped {
                report::terminal::render_grouped("SOURCE POM ANALYZE", grouped, min_versions);
            }
            if let Some(diffs) = &comparison {
                report::terminal::render_comparison(diffs, "repo", "sources");
            }
        }
        OutputFormat::Json => {
            let conflicts = |g: &Option<sorter::Grouped>| {
                g.as_ref().map(|g| {
                    sorter::version_conflicts(g, min_versions)
                        .into_iter()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
            };
            let out = json!({
                "repository": repo_grouped,
                "repository_conflicts": conflicts(&repo_grouped),
                "sources": source_grouped,
                "sources_conflicts": conflicts(&source_grouped),
                "comparison": comparison,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

async fn load_lines(input: &LogInput, config: &Config, quiet: bool) -> Result<Vec<String>> {
    if let Some(file) = &input.file {
        return source::file::read_lines(file);
    }

    let Some(jobs) = &input.jobs else {
        bail!("specify --file, or --jobs with a URL template");
    };
    let jobs = split_jobs(jobs);
    if jobs.is_empty() {
        bail!("--jobs names no job");
    }

    let template = input
        .url_template
        .clone()
        .or_else(|| config.download.url_template.clone())
        .context("no URL template: pass --url-template or set download.url_template")?;
    if !template.contains(JOB_PLACEHOLDER) {
        warn!(template = %template, "URL template has no {} placeholder; every job fetches the same URL", JOB_PLACEHOLDER);
    }

    let downloader = LogDownloader::new(
        &template,
        config.download.timeout(),
        config.download.concurrency,
    )?;
    downloader.fetch_lines(&jobs, quiet).await
}

fn print_artifacts(artifacts: &HashSet<Artifact>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Terminal => {
            for line in report::artifact_lines(artifacts) {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            let mut sorted: Vec<&Artifact> = artifacts.iter().collect();
            sorted.sort();
            println!("{}", serde_json::to_string_pretty(&sorted)?);
        }
    }
    Ok(())
}

fn require_dir(path: &Path, what: &str) -> Result<()> {
    if !path.is_dir() {
        bail!("{what} [{}] is not a directory", path.display());
    }
    Ok(())
}

fn status(quiet: bool, message: &str) {
    if !quiet {
        eprintln!("  {} {}", "→".cyan(), message);
    }
}
