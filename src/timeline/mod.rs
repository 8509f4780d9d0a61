//! Release timeline: the horizontal axis of the dataset.
//!
//! Releases are kept sorted by date, unique by id and unique by date (the
//! first release seen for a given date wins). Every date-to-release lookup
//! in the crate goes through [`ReleaseTimeline::find_release_for_date`].

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::{Error, Release, Result};

/// Sorted, deduplicated mapping from release id to release date.
#[derive(Debug, Clone, Default)]
pub struct ReleaseTimeline {
    releases: Vec<Release>,
    index: HashMap<String, usize>,
}

impl ReleaseTimeline {
    /// Build a timeline from releases in any order.
    pub fn new(releases: impl IntoIterator<Item = Release>) -> Self {
        let mut sorted: Vec<Release> = releases.into_iter().collect();
        // stable: equal dates keep input order, so "first seen" survives dedup
        sorted.sort_by_key(|r| r.date);

        let mut kept: Vec<Release> = Vec::with_capacity(sorted.len());
        let mut index = HashMap::with_capacity(sorted.len());
        for release in sorted {
            if kept.last().is_some_and(|last| last.date == release.date) {
                tracing::debug!(release = %release.id, date = %release.date, "dropping release sharing a date");
                continue;
            }
            if index.contains_key(&release.id) {
                continue;
            }
            index.insert(release.id.clone(), kept.len());
            kept.push(release);
        }

        Self {
            releases: kept,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// All releases in chronological order.
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn get(&self, id: &str) -> Option<&Release> {
        self.index_of(id).map(|i| &self.releases[i])
    }

    /// Position of a release in chronological order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn at(&self, index: usize) -> Option<&Release> {
        self.releases.get(index)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn latest(&self) -> Option<&Release> {
        self.releases.last()
    }

    /// Earliest release whose date is on or after `date`.
    ///
    /// Dates after the last release belong to unreleased work and yield
    /// [`Error::NoReleaseFound`]; callers decide whether to drop the record.
    pub fn find_release_for_date(&self, date: NaiveDate) -> Result<&Release> {
        let pos = self.releases.partition_point(|r| r.date < date);
        self.releases
            .get(pos)
            .ok_or(Error::NoReleaseFound { date })
    }

    /// Chronological successor of `id`; `None` for the last (or an unknown) release.
    pub fn next_release(&self, id: &str) -> Option<&Release> {
        self.index_of(id).and_then(|i| self.releases.get(i + 1))
    }

    /// Whether release `a` is strictly after release `b`.
    ///
    /// Fails with [`Error::UnknownRelease`] when either id is not on the timeline.
    pub fn is_after(&self, a: &str, b: &str) -> Result<bool> {
        let a = self.require(a)?;
        let b = self.require(b)?;
        Ok(a.date > b.date)
    }

    /// The chronologically first ⌈n/2⌉ releases (evaluation horizon).
    pub fn first_half(&self) -> &[Release] {
        let n = self.releases.len();
        &self.releases[..n.div_ceil(2)]
    }

    /// Whether `id` is within [`first_half`](Self::first_half).
    pub fn in_first_half(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|i| i < self.releases.len().div_ceil(2))
    }

    /// Releases with index in `[from, to)`, clamped to the timeline.
    pub fn slice(&self, from: usize, to: usize) -> &[Release] {
        let to = to.min(self.releases.len());
        let from = from.min(to);
        &self.releases[from..to]
    }

    fn require(&self, id: &str) -> Result<&Release> {
        self.get(id).ok_or_else(|| Error::UnknownRelease { id: id.to_string() })
    }
}
