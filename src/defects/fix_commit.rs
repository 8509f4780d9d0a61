//! Binding defects to the commits that fixed them.
//!
//! A commit references a defect when its message contains the ticket key as
//! a whole token. The referencing commit dated on the tracker's fix date is
//! the fix commit; otherwise the latest referencing commit is used.

use chrono::NaiveDate;
use rayon::prelude::*;
use regex::Regex;

use crate::core::{Commit, DefectRecord, Diagnostics, Error, Result};
use crate::timeline::ReleaseTimeline;

/// Matcher for one ticket key that refuses partial tokens
/// (`PROJ-1` does not match `PROJ-12` or `SUBPROJ-1`).
#[derive(Debug, Clone)]
pub struct TicketPattern {
    regex: Regex,
}

impl TicketPattern {
    pub fn new(key: &str) -> Result<Self> {
        let pattern = format!(r"(?:^|[^\w]){}(?:$|[^\w])", regex::escape(key));
        let regex = Regex::new(&pattern)
            .map_err(|e| Error::invalid_data(format!("bad ticket key {key:?}: {e}")))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, message: &str) -> bool {
        self.regex.is_match(message)
    }
}

/// Associates each defect with its fix commit and other referencing commits.
#[derive(Debug, Clone)]
pub struct FixCommitResolver {
    /// Candidates are dated strictly before this day (the latest release).
    cutoff: Option<NaiveDate>,
}

impl FixCommitResolver {
    pub fn new(timeline: &ReleaseTimeline) -> Self {
        Self {
            cutoff: timeline.latest().map(|r| r.date),
        }
    }

    /// Resolve fix commits for all defects; unresolvable defects are dropped
    /// and counted. Defect order is preserved.
    pub fn resolve(
        &self,
        defects: Vec<DefectRecord>,
        commits: &[Commit],
    ) -> Result<(Vec<DefectRecord>, Diagnostics)> {
        let candidates: Vec<&Commit> = commits
            .iter()
            .filter(|c| self.cutoff.is_none_or(|cutoff| c.day() < cutoff))
            .collect();

        let outcomes: Vec<Result<DefectRecord>> = defects
            .into_par_iter()
            .map(|defect| self.bind(defect, &candidates))
            .collect();

        let mut diagnostics = Diagnostics::default();
        let mut kept = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(defect) => kept.push(defect),
                Err(Error::UnresolvableDefect { key }) => {
                    tracing::warn!(defect = %key, "no commit references defect, dropping");
                    diagnostics.defects_unresolvable += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            kept = kept.len(),
            dropped = diagnostics.defects_unresolvable,
            "fix commits resolved"
        );
        Ok((kept, diagnostics))
    }

    /// Bind a single defect against candidate commits in chronological order.
    pub fn bind(&self, mut defect: DefectRecord, commits: &[&Commit]) -> Result<DefectRecord> {
        let pattern = TicketPattern::new(&defect.key)?;

        for commit in commits.iter().filter(|c| pattern.is_match(&c.message)) {
            if defect.fix_commit.is_none() && commit.day() == defect.fixed {
                defect.fix_commit = Some((*commit).clone());
            } else {
                defect.other_commits.push((*commit).clone());
            }
        }

        if defect.fix_commit.is_none() {
            let latest = defect
                .other_commits
                .iter()
                .enumerate()
                .fold(None::<(usize, &Commit)>, |best, (i, c)| match best {
                    Some((_, b)) if c.date <= b.date => best,
                    _ => Some((i, c)),
                })
                .map(|(i, _)| i);

            match latest {
                Some(i) => defect.fix_commit = Some(defect.other_commits.remove(i)),
                None => return Err(Error::UnresolvableDefect { key: defect.key }),
            }
        }

        Ok(defect)
    }
}
