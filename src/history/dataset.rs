//! Reconstruction output.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::instance::FileInstance;
use crate::core::{Diagnostics, Release};

/// Live instance set as it stood when a first-half release closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub release: String,
    pub instances: Vec<FileInstance>,
}

/// Labelled instances for every release, plus the training snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub releases: Vec<Release>,
    /// Ids of the first-half releases, the default output horizon.
    pub horizon: Vec<String>,
    pub instances: Vec<FileInstance>,
    pub snapshots: Vec<Snapshot>,
    pub diagnostics: Diagnostics,
}

impl Dataset {
    /// Rows to emit: every release with `full_history`, otherwise the
    /// first-half horizon only.
    pub fn rows(&self, full_history: bool) -> impl Iterator<Item = &FileInstance> + '_ {
        let horizon: HashSet<&str> = self.horizon.iter().map(String::as_str).collect();
        self.instances
            .iter()
            .filter(move |i| full_history || horizon.contains(i.release.as_str()))
    }

    pub fn instances_in<'d>(&'d self, release: &'d str) -> impl Iterator<Item = &'d FileInstance> {
        self.instances.iter().filter(move |i| i.release == release)
    }

    pub fn instance(&self, release: &str, filename: &str) -> Option<&FileInstance> {
        self.instances
            .iter()
            .find(|i| i.release == release && i.filename == filename)
    }

    pub fn snapshot(&self, release: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.release == release)
    }

    pub fn buggy_count(&self) -> usize {
        self.instances.iter().filter(|i| i.buggy).count()
    }
}

/// Keep the first instance of every (release, filename) pair; returns the
/// kept instances and how many were dropped.
pub fn dedupe_by_release(instances: Vec<FileInstance>) -> (Vec<FileInstance>, usize) {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(instances.len());
    let before = instances.len();
    let kept: Vec<FileInstance> = instances
        .into_iter()
        .filter(|i| seen.insert((i.release.clone(), i.filename.clone())))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
