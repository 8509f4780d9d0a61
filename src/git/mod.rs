//! Version-control access: the [`VcsSource`] seam used by reconstruction and
//! its libgit2 implementation.

mod log;
mod patch;

use std::path::Path;

use chrono::NaiveDate;
use git2::Repository;

use crate::core::{Commit, Error, Result};
use crate::history::{DiffEvent, PathFilter};

/// Source of commits and file-level diffs.
pub trait VcsSource {
    /// Commits reachable from HEAD, oldest first, optionally stopping at
    /// commits dated on or before `until`.
    fn commit_log(&self, until: Option<NaiveDate>) -> Result<Vec<Commit>>;

    /// File events turning `previous` into `current`. With no previous
    /// commit every file of `current` is reported as added.
    fn diff(&self, previous: Option<&Commit>, current: &Commit) -> Result<Vec<DiffEvent>>;
}

/// Git repository wrapper for history reconstruction.
pub struct GitRepo {
    repo: Repository,
    detect_copies: bool,
    filter: Option<PathFilter>,
}

impl GitRepo {
    /// Open a git repository at (or above) the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::discover(path.as_ref())
            .map_err(|e| Error::git(format!("Failed to open repository: {}", e.message())))?;

        Ok(Self {
            repo,
            detect_copies: true,
            filter: None,
        })
    }

    /// Toggle copy detection in diffs (renames are always detected).
    pub fn with_copy_detection(mut self, enabled: bool) -> Self {
        self.detect_copies = enabled;
        self
    }

    /// Skip patch extraction for paths the filter rejects.
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl VcsSource for GitRepo {
    fn commit_log(&self, until: Option<NaiveDate>) -> Result<Vec<Commit>> {
        log::commit_log(&self.repo, until)
    }

    fn diff(&self, previous: Option<&Commit>, current: &Commit) -> Result<Vec<DiffEvent>> {
        patch::diff_commits(
            &self.repo,
            previous,
            current,
            self.detect_copies,
            self.filter.as_ref(),
        )
    }
}
