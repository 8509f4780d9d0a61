//! Run-level counters describing what was dropped or repaired.

use serde::{Deserialize, Serialize};

/// Counts surfaced at the end of a run; dataset quality is the product, so
/// nothing is dropped without being counted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Tickets received from the defect source.
    pub defects_fetched: usize,
    /// Tickets dropped because their dates were missing or unparsable.
    pub defects_malformed: usize,
    /// Defects dropped because the opening or fix date has no release.
    pub defects_without_release: usize,
    /// Defects dropped because no commit references them.
    pub defects_unresolvable: usize,
    /// Declared affected-version sets that failed validation.
    pub invalid_affected_versions: usize,
    /// Defects whose injected version was estimated by proportion.
    pub proportion_estimated: usize,
    /// Defects kept after both resolvers.
    pub defects_kept: usize,
    /// Commits dated after the last release.
    pub commits_without_release: usize,
    /// Diff events applied to the instance set.
    pub events_applied: usize,
    /// Diff events ignored (missing or stale instance, no-op rename).
    pub events_ignored: usize,
    /// Copy/rename/add events that would have duplicated a live filename.
    pub name_collisions: usize,
    /// Instances dropped by the final duplicate-filename pass.
    pub duplicate_instances: usize,
    /// Final mean of the proportion statistic.
    pub proportion: f64,
}

impl Diagnostics {
    /// Fold counters from another stage into this one.
    pub fn merge(&mut self, other: &Diagnostics) {
        self.defects_fetched += other.defects_fetched;
        self.defects_malformed += other.defects_malformed;
        self.defects_without_release += other.defects_without_release;
        self.defects_unresolvable += other.defects_unresolvable;
        self.invalid_affected_versions += other.invalid_affected_versions;
        self.proportion_estimated += other.proportion_estimated;
        self.defects_kept += other.defects_kept;
        self.commits_without_release += other.commits_without_release;
        self.events_applied += other.events_applied;
        self.events_ignored += other.events_ignored;
        self.name_collisions += other.name_collisions;
        self.duplicate_instances += other.duplicate_instances;
        if other.proportion != 0.0 {
            self.proportion = other.proportion;
        }
    }

    /// Total number of defects discarded after fetching.
    pub fn defects_dropped(&self) -> usize {
        self.defects_malformed + self.defects_without_release + self.defects_unresolvable
    }
}
