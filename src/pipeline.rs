//! End-to-end dataset construction.

use tracing::info;

use crate::core::{progress, DefectRecord, Diagnostics, Error, Result};
use crate::defects::{DefectVersionResolver, FixCommitResolver};
use crate::git::VcsSource;
use crate::history::{group_commits_by_release, Dataset, HistoryReconstructor, PathFilter};
use crate::jira::{DefectSource, ReleaseSource};
use crate::timeline::ReleaseTimeline;

/// Fetch releases and build the timeline; an empty timeline is an error.
pub fn build_timeline(source: &dyn ReleaseSource, project: &str) -> Result<ReleaseTimeline> {
    let spinner = progress::create_spinner(&format!("Fetching releases of {project}"));
    let timeline = ReleaseTimeline::new(source.list_releases(project)?);
    spinner.finish_and_clear();

    if timeline.is_empty() {
        return Err(Error::invalid_data(format!(
            "project {project} has no dated releases"
        )));
    }
    info!(
        project,
        releases = timeline.len(),
        horizon = timeline.first_half().len(),
        "timeline built"
    );
    Ok(timeline)
}

/// Wires the tracker, the repository and the resolvers together.
pub struct Pipeline<'a> {
    releases: &'a dyn ReleaseSource,
    defects: &'a dyn DefectSource,
    vcs: &'a dyn VcsSource,
    filter: PathFilter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        releases: &'a dyn ReleaseSource,
        defects: &'a dyn DefectSource,
        vcs: &'a dyn VcsSource,
    ) -> Self {
        Self {
            releases,
            defects,
            vcs,
            filter: PathFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Run every stage and return the labelled dataset.
    pub fn run(&self, project: &str) -> Result<Dataset> {
        let timeline = build_timeline(self.releases, project)?;
        let mut diagnostics = Diagnostics::default();

        let spinner = progress::create_spinner(&format!("Fetching fixed bugs of {project}"));
        let batch = self.defects.list_fixed_defects(project)?;
        spinner.finish_and_clear();
        diagnostics.defects_fetched = batch.received();
        diagnostics.defects_malformed = batch.malformed;
        let tickets = batch.tickets;

        let until = timeline.latest().map(|r| r.date);
        let commits = self.vcs.commit_log(until)?;
        info!(tickets = tickets.len(), commits = commits.len(), "inputs loaded");

        let records: Vec<DefectRecord> = tickets.into_iter().map(DefectRecord::from).collect();
        let (records, fix_diagnostics) = FixCommitResolver::new(&timeline).resolve(records, &commits)?;
        diagnostics.merge(&fix_diagnostics);

        let (records, version_diagnostics) = DefectVersionResolver::new(&timeline).resolve(records)?;
        diagnostics.merge(&version_diagnostics);

        let (grouped, dropped) = group_commits_by_release(&timeline, commits)?;
        diagnostics.commits_without_release = dropped;

        let mut dataset = HistoryReconstructor::new(&timeline, self.vcs)
            .with_filter(self.filter.clone())
            .compute_dataset(&grouped, &records)?;
        diagnostics.merge(&dataset.diagnostics);
        dataset.diagnostics = diagnostics;

        info!(
            instances = dataset.instances.len(),
            buggy = dataset.buggy_count(),
            defects = dataset.diagnostics.defects_kept,
            "dataset built"
        );
        Ok(dataset)
    }
}
