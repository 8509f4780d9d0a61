//! Commit log extraction.

use chrono::{DateTime, NaiveDate, Utc};
use git2::{Repository, Sort};

use crate::core::{Commit, Error, Result};

fn timestamp(time: git2::Time) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(time.seconds(), 0)
        .ok_or_else(|| Error::git(format!("commit time out of range: {}", time.seconds())))
}

/// Project a libgit2 commit onto the crate's commit record.
pub(super) fn to_commit(commit: &git2::Commit<'_>) -> Result<Commit> {
    let id = commit.id().to_string();
    let short_id = id.chars().take(7).collect();
    let author = commit.author();
    Ok(Commit {
        id,
        short_id,
        date: timestamp(commit.committer().when())?,
        author: author.name().unwrap_or_default().to_string(),
        authored: timestamp(author.when())?,
        message: commit.message().unwrap_or_default().to_string(),
    })
}

/// Walk HEAD oldest first, keeping commits dated on or before `until`.
pub(super) fn commit_log(repo: &Repository, until: Option<NaiveDate>) -> Result<Vec<Commit>> {
    let mut revwalk = repo.revwalk()?;
    revwalk
        .push_head()
        .map_err(|e| Error::git(format!("Failed to walk HEAD: {}", e.message())))?;
    revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;

    let mut commits = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        let commit = to_commit(&commit)?;
        if until.is_none_or(|limit| commit.day() <= limit) {
            commits.push(commit);
        }
    }
    // TIME ordering follows the committer clock only loosely across merges
    commits.sort_by_key(|c| c.date);

    tracing::debug!(commits = commits.len(), "read commit log");
    Ok(commits)
}
