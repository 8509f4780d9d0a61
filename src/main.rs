//! defectset CLI - labelled defect-prediction datasets from Jira and git.

use std::io::{stderr, stdout, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use defectset::cli::{Cli, Command};
use defectset::config::{Config, OutputFormat};
use defectset::git::GitRepo;
use defectset::jira::JiraClient;
use defectset::output::{write_dataset, write_release_table, write_summary, OutputOptions};
use defectset::pipeline::{build_timeline, Pipeline};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "defectset=debug" } else { "defectset=info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> defectset::core::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default(".")?,
    };

    match cli.command {
        Command::Dataset(args) => {
            args.apply(&mut config);
            let project = config.project_key()?.to_string();
            let filter = config.path_filter();

            let jira = JiraClient::from_config(&config.jira)?;
            let repo = GitRepo::open(&config.git.repo)?
                .with_copy_detection(config.git.detect_copies)
                .with_filter(filter.clone());

            let dataset = Pipeline::new(&jira, &jira, &repo)
                .with_filter(filter)
                .run(&project)?;

            let options = OutputOptions {
                dir: config.output.dir.clone(),
                format: config.output.format,
                full_history: config.output.full_history,
                write_snapshots: config.output.write_snapshots,
            };
            for path in write_dataset(&dataset, &project, &options)? {
                eprintln!("wrote {}", path.display());
            }
            if cli.verbose {
                write_summary(&dataset, &mut stderr())?;
            }

            let mut out = stdout().lock();
            serde_json::to_writer_pretty(&mut out, &dataset.diagnostics)?;
            writeln!(out)?;
        }
        Command::Releases(args) => {
            args.apply(&mut config);
            let project = config.project_key()?.to_string();
            let jira = JiraClient::from_config(&config.jira)?;
            let timeline = build_timeline(&jira, &project)?;

            let format = if args.json { OutputFormat::Json } else { OutputFormat::Csv };
            write_release_table(format, timeline.releases(), &mut stdout().lock())?;

            let horizon = timeline.first_half();
            if let Some(last) = horizon.last() {
                eprintln!(
                    "horizon: first {} of {} releases (through {} on {})",
                    horizon.len(),
                    timeline.len(),
                    last.id,
                    last.date
                );
            }
        }
    }

    Ok(())
}
