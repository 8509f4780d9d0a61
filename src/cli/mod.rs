//! CLI implementation using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{self, Config};

/// defectset - Build labelled defect-prediction datasets from Jira and git.
#[derive(Parser)]
#[command(name = "defectset")]
#[command(
    author,
    version,
    about = "Build labelled defect-prediction datasets from Jira and git",
    long_about = None
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconstruct file history and write the labelled dataset
    #[command(alias = "ds")]
    Dataset(DatasetArgs),

    /// List the release timeline and its first-half horizon
    #[command(alias = "rel")]
    Releases(ReleasesArgs),
}

#[derive(Args)]
pub struct DatasetArgs {
    /// Path to the git repository
    #[arg(short, long)]
    pub repo: Option<PathBuf>,

    /// Jira project key
    #[arg(short, long)]
    pub project: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Emit rows for every release, not only the first half
    #[arg(long)]
    pub full_history: bool,

    /// Do not write per-release snapshot files
    #[arg(long)]
    pub no_snapshots: bool,

    /// Keep test sources in the dataset
    #[arg(long)]
    pub include_tests: bool,
}

impl DatasetArgs {
    /// Fold command-line flags over the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(repo) = &self.repo {
            config.git.repo = repo.clone();
        }
        if let Some(project) = &self.project {
            config.project.key = Some(project.clone());
        }
        if let Some(dir) = &self.output {
            config.output.dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format.into();
        }
        if self.full_history {
            config.output.full_history = true;
        }
        if self.no_snapshots {
            config.output.write_snapshots = false;
        }
        if self.include_tests {
            config.filter.exclude_tests = false;
        }
    }
}

#[derive(Args)]
pub struct ReleasesArgs {
    /// Jira project key
    #[arg(short, long)]
    pub project: Option<String>,

    /// Print the table as JSON instead of CSV
    #[arg(long)]
    pub json: bool,
}

impl ReleasesArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(project) = &self.project {
            config.project.key = Some(project.clone());
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Arff,
    Json,
}

impl From<OutputFormat> for config::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Arff => Self::Arff,
            OutputFormat::Json => Self::Json,
        }
    }
}
