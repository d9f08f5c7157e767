use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "artifact-analyzer",
    about = "Inventory build artifacts from logs, lists and project descriptors",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file [default: ./.artifact-analyzer/config.toml, fallback ~/.config/artifact-analyzer/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "terminal", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path substring to prune from directory scans (repeatable; replaces the configured list)
    #[arg(long = "skip", global = true, value_name = "SUBSTRING")]
    pub skip: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress and status lines
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List artifacts a build log reports as missing
    Missing(LogInput),

    /// List artifacts from `g:a:extension:classifier:version` build lists
    BuildGavs(LogInput),

    /// Print the distinct artifacts of several list files
    Join {
        /// Comma-separated list files
        #[arg(value_delimiter = ',', required = true)]
        lists: Vec<PathBuf>,
    },

    /// List every coordinate declared under a repository or source root
    List {
        /// Root directory to scan
        #[arg(short, long)]
        repo: PathBuf,
    },

    /// Print the project dependency map of a sources root
    Makefile {
        /// Directory whose subdirectories are projects
        #[arg(short, long)]
        sources: PathBuf,

        /// Also print a build order; fails when projects depend on each other in a cycle
        #[arg(long)]
        order: bool,
    },

    /// Group and compare artifacts of a local repository and a sources root
    Analyze {
        /// Sources root
        #[arg(short, long)]
        sources: Option<PathBuf>,

        /// Maven repository root; also used to resolve placeholder versions
        #[arg(short, long)]
        repo: Option<PathBuf>,

        /// Flag keys with at least this many versions [default: from config]
        #[arg(long, value_name = "N")]
        min_versions: Option<usize>,
    },
}

/// Where log lines come from: a local file or CI job downloads.
#[derive(Args, Debug)]
pub struct LogInput {
    /// Local log or list file
    #[arg(short, long, conflicts_with_all = ["jobs", "url_template"])]
    pub file: Option<PathBuf>,

    /// Job URL template, `{job}` is replaced by each job name [default: from config]
    #[arg(short, long)]
    pub url_template: Option<String>,

    /// Comma-separated CI job names
    #[arg(short, long)]
    pub jobs: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
