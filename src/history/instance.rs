//! A (release, file) pair and its metrics.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::diff::LineCounts;

/// One file as it exists at the end of one release.
///
/// Per-release counters (`revisions`, `loc_touched`, `loc_added`, `churn`)
/// restart at zero in every release; `historical_*` counters, maxima and
/// averages accumulate over the file's whole lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInstance {
    pub release: String,
    pub filename: String,
    pub creation_date: NaiveDate,
    pub previous_names: BTreeSet<String>,
    pub buggy: bool,
    pub authors: BTreeSet<String>,
    pub size: u64,
    pub loc_touched: u64,
    pub loc_added: u64,
    pub churn: i64,
    pub max_loc_added: u64,
    pub max_churn: i64,
    pub avg_loc_added: f64,
    pub avg_churn: f64,
    pub revisions: u32,
    pub historical_loc_touched: u64,
    pub historical_loc_added: u64,
    pub historical_churn: i64,
    pub historical_revisions: u32,
    pub fixed_bugs: BTreeSet<String>,
    /// Weeks between creation and the release date.
    pub age: u64,
}

impl FileInstance {
    pub fn new(release: impl Into<String>, filename: impl Into<String>, created: NaiveDate) -> Self {
        Self {
            release: release.into(),
            filename: filename.into(),
            creation_date: created,
            previous_names: BTreeSet::new(),
            buggy: false,
            authors: BTreeSet::new(),
            size: 0,
            loc_touched: 0,
            loc_added: 0,
            churn: 0,
            max_loc_added: 0,
            max_churn: 0,
            avg_loc_added: 0.0,
            avg_churn: 0.0,
            revisions: 0,
            historical_loc_touched: 0,
            historical_loc_added: 0,
            historical_churn: 0,
            historical_revisions: 0,
            fixed_bugs: BTreeSet::new(),
            age: 0,
        }
    }

    /// Copy of this instance as it enters `release`: the bug label and the
    /// per-release counters are reset, everything cumulative is kept.
    pub fn carry_into(&self, release: impl Into<String>) -> Self {
        Self {
            release: release.into(),
            buggy: false,
            revisions: 0,
            loc_touched: 0,
            loc_added: 0,
            churn: 0,
            ..self.clone()
        }
    }

    /// Count one commit touching this file.
    pub fn record_revision(&mut self, author: &str) {
        self.revisions += 1;
        self.historical_revisions += 1;
        if !author.is_empty() {
            self.authors.insert(author.to_string());
        }
    }

    /// Fold the line counts of one revision into size and churn metrics.
    pub fn apply_lines(&mut self, counts: LineCounts) {
        let added = u64::from(counts.added);
        let touched = u64::from(counts.touched());
        let churn = counts.churn();

        self.size = self.size.saturating_add_signed(churn);

        self.loc_touched += touched;
        self.historical_loc_touched += touched;
        self.loc_added += added;
        self.historical_loc_added += added;
        self.churn += churn;
        self.historical_churn += churn;

        self.max_loc_added = self.max_loc_added.max(added);
        self.max_churn = self.max_churn.max(churn);

        if self.historical_revisions > 0 {
            let revs = f64::from(self.historical_revisions);
            self.avg_loc_added = self.historical_loc_added as f64 / revs;
            self.avg_churn = self.historical_churn as f64 / revs;
        }
    }

    /// Move the instance to `name`, remembering the old one.
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.filename {
            let old = std::mem::replace(&mut self.filename, name);
            self.previous_names.insert(old);
        }
    }

    /// `ceil(|days(creation, release)| / 7)`.
    pub fn set_age_at(&mut self, release_date: NaiveDate) {
        let days = (release_date - self.creation_date).num_days().unsigned_abs();
        self.age = days.div_ceil(7);
    }

    pub fn number_of_authors(&self) -> usize {
        self.authors.len()
    }

    pub fn number_of_fixed_bugs(&self) -> usize {
        self.fixed_bugs.len()
    }

    /// Age weighted by lifetime lines touched, 0 for untouched files.
    pub fn weighted_age(&self) -> f64 {
        if self.historical_loc_touched == 0 {
            0.0
        } else {
            self.age as f64 / self.historical_loc_touched as f64
        }
    }
}
