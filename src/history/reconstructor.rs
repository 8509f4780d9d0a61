//! Replays the commit history release by release and maintains the live
//! instance set.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info, trace};

use super::dataset::{dedupe_by_release, Dataset, Snapshot};
use super::diff::{DiffEvent, Edit, LineCounts};
use super::filter::PathFilter;
use super::instance::FileInstance;
use super::state::ReconstructionState;
use crate::core::{progress, Commit, DefectRecord, Diagnostics, Error, Result};
use crate::defects::DefectIndex;
use crate::git::VcsSource;
use crate::timeline::ReleaseTimeline;

/// Commits grouped under the release whose window contains them.
pub type CommitsByRelease = HashMap<String, Vec<Commit>>;

/// Group commits by release (first release dated on or after the commit
/// day). Commits after the last release are dropped and counted.
pub fn group_commits_by_release(
    timeline: &ReleaseTimeline,
    commits: impl IntoIterator<Item = Commit>,
) -> Result<(CommitsByRelease, usize)> {
    let mut grouped: CommitsByRelease = HashMap::new();
    let mut dropped = 0;
    for commit in commits {
        match timeline.find_release_for_date(commit.day()) {
            Ok(release) => grouped.entry(release.id.clone()).or_default().push(commit),
            Err(Error::NoReleaseFound { .. }) => dropped += 1,
            Err(e) => return Err(e),
        }
    }
    for commits in grouped.values_mut() {
        commits.sort_by_key(|c| c.date);
    }
    Ok((grouped, dropped))
}

/// What a single event did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Applied,
    Ignored,
    Collision,
}

/// Rebuilds per-release file instances from the commit history.
pub struct HistoryReconstructor<'a, V: ?Sized> {
    timeline: &'a ReleaseTimeline,
    vcs: &'a V,
    filter: PathFilter,
}

impl<'a, V: VcsSource + ?Sized> HistoryReconstructor<'a, V> {
    pub fn new(timeline: &'a ReleaseTimeline, vcs: &'a V) -> Self {
        Self {
            timeline,
            vcs,
            filter: PathFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replay every release in timeline order.
    ///
    /// Each commit is diffed against the commit processed before it (the
    /// first one against the empty tree). A diff failure aborts the run.
    pub fn compute_dataset(
        &self,
        commits: &CommitsByRelease,
        defects: &[DefectRecord],
    ) -> Result<Dataset> {
        let index = DefectIndex::new(defects);
        let mut state = ReconstructionState::new();
        let mut diagnostics = Diagnostics::default();
        let mut snapshots = Vec::new();
        let mut previous: Option<&Commit> = None;

        let bar = progress::create_progress(self.timeline.len(), "Releases");

        for release in self.timeline.releases() {
            let release_commits = commits.get(&release.id).map_or(&[][..], Vec::as_slice);
            bar.set_message(release.id.clone());
            debug!(release = %release.id, commits = release_commits.len(), "replaying release");

            for commit in release_commits {
                let events = self.vcs.diff(previous, commit)?;
                let bound: Vec<&DefectRecord> = index.for_commit(&commit.id).collect();

                for event in events.into_iter().filter_map(|e| self.filter.restrict(e)) {
                    let outcome = self.apply(&mut state, &release.id, commit, &event, &bound)?;
                    trace!(commit = %commit.short_id, event = event.name(), ?outcome, "event replayed");
                    match outcome {
                        Outcome::Applied => diagnostics.events_applied += 1,
                        Outcome::Ignored => diagnostics.events_ignored += 1,
                        Outcome::Collision => diagnostics.name_collisions += 1,
                    }
                }
                previous = Some(commit);
            }

            self.close_release(&mut state, &release.id, &mut snapshots);
            bar.inc(1);
        }
        bar.finish_and_clear();

        let mut instances = state.into_live();
        instances.sort_by_key(|i| self.timeline.index_of(&i.release));
        let (instances, duplicates) = dedupe_by_release(instances);
        diagnostics.duplicate_instances = duplicates;

        info!(
            instances = instances.len(),
            snapshots = snapshots.len(),
            applied = diagnostics.events_applied,
            ignored = diagnostics.events_ignored,
            "history reconstructed"
        );

        Ok(Dataset {
            releases: self.timeline.releases().to_vec(),
            horizon: self
                .timeline
                .first_half()
                .iter()
                .map(|r| r.id.clone())
                .collect(),
            instances,
            snapshots,
            diagnostics,
        })
    }

    /// Age the release's instances, snapshot if it is a training release and
    /// carry every live instance into the next release.
    fn close_release(
        &self,
        state: &mut ReconstructionState,
        release: &str,
        snapshots: &mut Vec<Snapshot>,
    ) {
        let live = state.live_in_release(release);
        if let Some(date) = self.timeline.get(release).map(|r| r.date) {
            for &idx in &live {
                state.get_mut(idx).set_age_at(date);
            }
        }

        if self.timeline.in_first_half(release) {
            let (instances, _) = dedupe_by_release(state.snapshot());
            snapshots.push(Snapshot {
                release: release.to_string(),
                instances,
            });
        }

        if let Some(next) = self.timeline.next_release(release) {
            for idx in live {
                let carried = state.get(idx).carry_into(next.id.as_str());
                state.insert(carried);
            }
        }
    }

    fn apply(
        &self,
        state: &mut ReconstructionState,
        release: &str,
        commit: &Commit,
        event: &DiffEvent,
        bound: &[&DefectRecord],
    ) -> Result<Outcome> {
        match event {
            DiffEvent::Add { path, edits } => Ok(add(state, release, commit, path, edits)),
            DiffEvent::Copy { from, to } => self.relocate(state, release, commit, from, to),
            DiffEvent::Delete { path } => Ok(delete(state, release, path)),
            DiffEvent::Modify { path, edits } => {
                Ok(modify(state, release, commit, path, edits, bound))
            }
            DiffEvent::Rename { from, to } if from == to => Ok(Outcome::Ignored),
            DiffEvent::Rename { from, to } => self.relocate(state, release, commit, from, to),
        }
    }

    /// Copy and rename: the latest instance of `from` becomes `to`, in
    /// place when it belongs to this release, otherwise as a fresh instance
    /// carried forward from its older release.
    fn relocate(
        &self,
        state: &mut ReconstructionState,
        release: &str,
        commit: &Commit,
        from: &str,
        to: &str,
    ) -> Result<Outcome> {
        let Some(idx) = state.latest(from) else {
            return Ok(Outcome::Ignored);
        };
        if state.latest_in(to, release).is_some() {
            return Ok(Outcome::Collision);
        }

        let owner = state.get(idx).release.clone();
        if owner == release {
            state.get_mut(idx).record_revision(&commit.author);
            state.rename(idx, to);
            return Ok(Outcome::Applied);
        }

        if !self.timeline.is_after(release, &owner)? {
            return Ok(Outcome::Ignored);
        }
        let mut carried = state.get(idx).carry_into(release);
        carried.record_revision(&commit.author);
        carried.rename(to);
        state.insert(carried);
        Ok(Outcome::Applied)
    }
}

fn add(
    state: &mut ReconstructionState,
    release: &str,
    commit: &Commit,
    path: &str,
    edits: &[Edit],
) -> Outcome {
    if state.latest_in(path, release).is_some() {
        return Outcome::Collision;
    }
    let mut instance = FileInstance::new(release, path, commit.authored_day());
    instance.record_revision(&commit.author);
    instance.apply_lines(LineCounts::from_edits(edits));
    state.insert(instance);
    Outcome::Applied
}

fn delete(state: &mut ReconstructionState, release: &str, path: &str) -> Outcome {
    match state.latest(path) {
        Some(idx) if state.get(idx).release == release => {
            state.remove(idx);
            Outcome::Applied
        }
        _ => Outcome::Ignored,
    }
}

fn modify(
    state: &mut ReconstructionState,
    release: &str,
    commit: &Commit,
    path: &str,
    edits: &[Edit],
    bound: &[&DefectRecord],
) -> Outcome {
    let Some(idx) = state.latest(path).filter(|&i| state.get(i).release == release) else {
        return Outcome::Ignored;
    };

    let instance = state.get_mut(idx);
    instance.record_revision(&commit.author);
    instance.apply_lines(LineCounts::from_edits(edits));

    if bound.is_empty() {
        return Outcome::Applied;
    }

    let names: BTreeSet<String> = std::iter::once(path.to_string())
        .chain(state.get(idx).previous_names.iter().cloned())
        .collect();
    let affected: BTreeSet<&str> = bound
        .iter()
        .flat_map(|d| d.affected_versions.iter().map(String::as_str))
        .collect();

    for version in affected {
        for name in &names {
            for target in state.live_named_in(name, version) {
                state.get_mut(target).buggy = true;
            }
        }
    }

    let instance = state.get_mut(idx);
    for defect in bound {
        instance.fixed_bugs.insert(defect.key.clone());
    }
    Outcome::Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Release;
    use chrono::{NaiveDate, TimeZone, Utc};

    /// In-memory VCS: diffs are looked up by the current commit id.
    #[derive(Default)]
    struct ScriptedVcs {
        diffs: HashMap<String, Vec<DiffEvent>>,
        fail_on: Option<String>,
    }

    impl VcsSource for ScriptedVcs {
        fn commit_log(&self, _until: Option<NaiveDate>) -> Result<Vec<Commit>> {
            Ok(Vec::new())
        }

        fn diff(&self, previous: Option<&Commit>, current: &Commit) -> Result<Vec<DiffEvent>> {
            if self.fail_on.as_deref() == Some(current.id.as_str()) {
                let from = previous.map_or("<root>", |c| c.id.as_str());
                return Err(Error::diff_retrieval(from, &current.id, "object not found"));
            }
            Ok(self.diffs.get(&current.id).cloned().unwrap_or_default())
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timeline(n: u32) -> ReleaseTimeline {
        ReleaseTimeline::new((1..=n).map(|i| Release::new(format!("v{i}"), day(2020, i, 28))))
    }

    fn commit(id: &str, m: u32, d: u32, author: &str) -> Commit {
        let ts = Utc.with_ymd_and_hms(2020, m, d, 10, 0, 0).unwrap();
        Commit {
            id: id.to_string(),
            short_id: id.to_string(),
            date: ts,
            author: author.to_string(),
            authored: ts,
            message: String::new(),
        }
    }

    fn add(path: &str, lines: u32) -> DiffEvent {
        DiffEvent::Add {
            path: path.into(),
            edits: vec![Edit::insert(lines)],
        }
    }

    fn modify(path: &str, edits: Vec<Edit>) -> DiffEvent {
        DiffEvent::Modify {
            path: path.into(),
            edits,
        }
    }

    fn rename(from: &str, to: &str) -> DiffEvent {
        DiffEvent::Rename {
            from: from.into(),
            to: to.into(),
        }
    }

    fn delete(path: &str) -> DiffEvent {
        DiffEvent::Delete { path: path.into() }
    }

    /// Build inputs from `(commit, events)` pairs.
    fn script(
        timeline: &ReleaseTimeline,
        steps: Vec<(Commit, Vec<DiffEvent>)>,
    ) -> (ScriptedVcs, CommitsByRelease) {
        let mut vcs = ScriptedVcs::default();
        let mut commits = Vec::new();
        for (commit, events) in steps {
            vcs.diffs.insert(commit.id.clone(), events);
            commits.push(commit);
        }
        let (grouped, _) = group_commits_by_release(timeline, commits).unwrap();
        (vcs, grouped)
    }

    fn run(
        timeline: &ReleaseTimeline,
        steps: Vec<(Commit, Vec<DiffEvent>)>,
        defects: &[DefectRecord],
    ) -> Dataset {
        let (vcs, grouped) = script(timeline, steps);
        HistoryReconstructor::new(timeline, &vcs)
            .compute_dataset(&grouped, defects)
            .unwrap()
    }

    #[test]
    fn test_add_then_delete_same_release_leaves_nothing() {
        let tl = timeline(1);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("A.java", 10)]),
                (commit("c2", 1, 6, "alice"), vec![delete("A.java")]),
            ],
            &[],
        );
        assert!(ds.instances.is_empty());
        assert_eq!(ds.diagnostics.events_applied, 2);
    }

    #[test]
    fn test_add_and_modify_count_revisions() {
        let tl = timeline(1);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("A.java", 10)]),
                (
                    commit("c2", 1, 6, "bob"),
                    vec![modify("A.java", vec![Edit::replace(2, 5), Edit::delete(1)])],
                ),
            ],
            &[],
        );
        let a = ds.instance("v1", "A.java").unwrap();
        assert_eq!(a.revisions, 2);
        assert_eq!(a.size, 12);
        assert_eq!(a.loc_added, 13);
        assert_eq!(a.loc_touched, 14);
        assert_eq!(a.number_of_authors(), 2);
        assert_eq!(a.creation_date, day(2020, 1, 5));
        assert_eq!(a.age, 4);
    }

    #[test]
    fn test_rename_across_releases_then_delete() {
        let tl = timeline(3);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("a/A.java", 10)]),
                (commit("c2", 2, 5, "alice"), vec![rename("a/A.java", "b/B.java")]),
                (commit("c3", 3, 5, "alice"), vec![delete("b/B.java")]),
            ],
            &[],
        );
        assert!(ds.instance("v1", "a/A.java").is_some());
        let b = ds.instance("v2", "b/B.java").unwrap();
        assert!(b.previous_names.contains("a/A.java"));
        assert_eq!(b.revisions, 1);
        assert_eq!(b.historical_revisions, 2);
        assert!(ds.instance("v2", "a/A.java").is_none());
        assert_eq!(ds.instances_in("v3").count(), 0);
    }

    #[test]
    fn test_untouched_file_propagates_to_every_release() {
        let tl = timeline(3);
        let ds = run(
            &tl,
            vec![(commit("c1", 1, 5, "alice"), vec![add("A.java", 7)])],
            &[],
        );
        for release in ["v1", "v2", "v3"] {
            let a = ds.instance(release, "A.java").unwrap();
            assert_eq!(a.size, 7);
            assert_eq!(a.historical_revisions, 1);
        }
        assert_eq!(ds.instance("v1", "A.java").unwrap().revisions, 1);
        assert_eq!(ds.instance("v3", "A.java").unwrap().revisions, 0);
        assert!(ds.instance("v3", "A.java").unwrap().age > ds.instance("v1", "A.java").unwrap().age);
    }

    #[test]
    fn test_fix_commit_labels_affected_releases() {
        let tl = timeline(4);
        let mut defect = DefectRecord::new("P-1", day(2020, 2, 1), day(2020, 3, 3), vec![]);
        defect.affected_versions = vec!["v1".into(), "v2".into()];
        defect.fix_commit = Some(commit("fix", 3, 3, "carol"));

        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("A.java", 10), add("B.java", 3)]),
                (commit("fix", 3, 3, "carol"), vec![modify("A.java", vec![Edit::replace(1, 1)])]),
            ],
            &[defect],
        );

        assert!(ds.instance("v1", "A.java").unwrap().buggy);
        assert!(ds.instance("v2", "A.java").unwrap().buggy);
        assert!(!ds.instance("v3", "A.java").unwrap().buggy);
        assert!(!ds.instance("v1", "B.java").unwrap().buggy);

        let fixed = ds.instance("v3", "A.java").unwrap();
        assert!(fixed.fixed_bugs.contains("P-1"));
        // fixed bugs accumulate into later releases
        assert_eq!(ds.instance("v4", "A.java").unwrap().number_of_fixed_bugs(), 1);
    }

    #[test]
    fn test_labels_follow_previous_names() {
        let tl = timeline(2);
        let mut defect = DefectRecord::new("P-2", day(2020, 1, 10), day(2020, 2, 10), vec![]);
        defect.affected_versions = vec!["v1".into()];
        defect.fix_commit = Some(commit("fix", 2, 10, "carol"));

        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("Old.java", 10)]),
                (commit("c2", 2, 5, "alice"), vec![rename("Old.java", "New.java")]),
                (commit("fix", 2, 10, "carol"), vec![modify("New.java", vec![Edit::insert(1)])]),
            ],
            &[defect],
        );
        assert!(ds.instance("v1", "Old.java").unwrap().buggy);
    }

    #[test]
    fn test_reused_name_does_not_label_old_lineage() {
        let tl = timeline(4);
        let mut defect = DefectRecord::new("P-4", day(2020, 2, 10), day(2020, 3, 10), vec![]);
        defect.affected_versions = vec!["v2".into()];
        defect.fix_commit = Some(commit("fix", 3, 10, "carol"));

        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("A.java", 10)]),
                (commit("c2", 2, 5, "alice"), vec![rename("A.java", "B.java")]),
                (commit("c3", 3, 5, "bob"), vec![add("A.java", 3)]),
                (commit("fix", 3, 10, "carol"), vec![modify("A.java", vec![Edit::insert(1)])]),
            ],
            &[defect],
        );

        assert!(!ds.instance("v2", "B.java").unwrap().buggy);
        assert_eq!(ds.instances_in("v2").filter(|i| i.buggy).count(), 0);
        assert!(!ds.instance("v1", "A.java").unwrap().buggy);

        let fixed = ds.instance("v3", "A.java").unwrap();
        assert!(fixed.previous_names.is_empty());
        assert!(fixed.fixed_bugs.contains("P-4"));
        assert!(ds.instance("v3", "B.java").unwrap().fixed_bugs.is_empty());
    }

    #[test]
    fn test_rename_then_modify_counts_each_event_once() {
        let tl = timeline(2);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("A.java", 5)]),
                (commit("c2", 2, 5, "bob"), vec![rename("A.java", "B.java")]),
                (commit("c3", 2, 6, "bob"), vec![modify("B.java", vec![Edit::insert(2)])]),
            ],
            &[],
        );

        let v2: Vec<&FileInstance> = ds.instances_in("v2").collect();
        assert_eq!(v2.len(), 1);
        let b = v2[0];
        assert_eq!(b.filename, "B.java");
        assert_eq!(b.revisions, 2);
        assert_eq!(b.historical_revisions, 3);
        assert_eq!(b.size, 7);
        assert_eq!(b.previous_names, BTreeSet::from(["A.java".to_string()]));
    }

    #[test]
    fn test_snapshots_freeze_labels() {
        let tl = timeline(4);
        let mut defect = DefectRecord::new("P-3", day(2020, 1, 10), day(2020, 4, 10), vec![]);
        defect.affected_versions = vec!["v1".into()];
        defect.fix_commit = Some(commit("fix", 4, 10, "carol"));

        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("A.java", 10)]),
                (commit("fix", 4, 10, "carol"), vec![modify("A.java", vec![Edit::insert(1)])]),
            ],
            &[defect],
        );

        assert_eq!(ds.horizon, vec!["v1".to_string(), "v2".to_string()]);
        assert_eq!(ds.snapshots.len(), 2);
        let early = ds.snapshot("v1").unwrap();
        assert_eq!(early.instances.len(), 1);
        assert!(!early.instances[0].buggy);
        assert_eq!(ds.snapshot("v2").unwrap().instances.len(), 2);
        assert!(ds.instance("v1", "A.java").unwrap().buggy);
        assert_eq!(ds.rows(false).count(), 2);
        assert_eq!(ds.rows(true).count(), 4);
    }

    #[test]
    fn test_stale_events_ignored() {
        let tl = timeline(2);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![modify("Ghost.java", vec![Edit::insert(1)])]),
                (commit("c2", 1, 6, "alice"), vec![delete("Ghost.java"), rename("X.java", "X.java")]),
            ],
            &[],
        );
        assert!(ds.instances.is_empty());
        assert_eq!(ds.diagnostics.events_ignored, 3);
        assert_eq!(ds.diagnostics.events_applied, 0);
    }

    #[test]
    fn test_rename_onto_live_name_is_collision() {
        let tl = timeline(1);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("A.java", 1), add("B.java", 2)]),
                (commit("c2", 1, 6, "alice"), vec![rename("A.java", "B.java"), add("B.java", 9)]),
            ],
            &[],
        );
        assert_eq!(ds.diagnostics.name_collisions, 2);
        assert_eq!(ds.instance("v1", "B.java").unwrap().size, 2);
        assert!(ds.instance("v1", "A.java").is_some());
    }

    #[test]
    fn test_copy_creates_new_name() {
        let tl = timeline(2);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("A.java", 4)]),
                (
                    commit("c2", 2, 5, "bob"),
                    vec![DiffEvent::Copy {
                        from: "A.java".into(),
                        to: "C.java".into(),
                    }],
                ),
            ],
            &[],
        );
        let c = ds.instance("v2", "C.java").unwrap();
        assert_eq!(c.size, 4);
        assert!(c.previous_names.contains("A.java"));
        assert!(c.authors.contains("bob"));
        // the copy takes over the v2 instance instead of duplicating it
        assert!(ds.instance("v1", "A.java").is_some());
        assert!(ds.instance("v2", "A.java").is_none());
        assert_eq!(c.revisions, 1);
    }

    #[test]
    fn test_filtered_paths_never_become_instances() {
        let tl = timeline(1);
        let ds = run(
            &tl,
            vec![(
                commit("c1", 1, 5, "alice"),
                vec![add("README.md", 3), add("src/test/FooTest.java", 3), add("Foo.java", 3)],
            )],
            &[],
        );
        assert_eq!(ds.instances.len(), 1);
        assert_eq!(ds.instances[0].filename, "Foo.java");
    }

    #[test]
    fn test_rename_into_test_tree_removes_file() {
        let tl = timeline(2);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("src/A.java", 4)]),
                (commit("c2", 2, 5, "alice"), vec![rename("src/A.java", "src/test/A.java")]),
            ],
            &[],
        );

        let rows: Vec<(&str, &str)> = ds
            .instances
            .iter()
            .map(|i| (i.release.as_str(), i.filename.as_str()))
            .collect();
        assert_eq!(rows, vec![("v1", "src/A.java")]);
        assert_eq!(ds.diagnostics.events_applied, 2);
    }

    #[test]
    fn test_rename_into_tracked_set_adds_file() {
        let tl = timeline(1);
        let ds = run(
            &tl,
            vec![
                (commit("c1", 1, 5, "alice"), vec![add("Notes.txt", 4)]),
                (commit("c2", 1, 6, "alice"), vec![rename("Notes.txt", "Notes.java")]),
                (commit("c3", 1, 7, "bob"), vec![modify("Notes.java", vec![Edit::insert(2)])]),
            ],
            &[],
        );

        assert_eq!(ds.instances.len(), 1);
        let notes = ds.instance("v1", "Notes.java").unwrap();
        assert_eq!(notes.revisions, 2);
        assert_eq!(notes.size, 2);
        assert_eq!(notes.creation_date, day(2020, 1, 6));
        assert_eq!(ds.diagnostics.events_ignored, 0);
        assert_eq!(ds.diagnostics.events_applied, 2);
    }

    #[test]
    fn test_diff_failure_aborts() {
        let tl = timeline(1);
        let (mut vcs, grouped) = script(
            &tl,
            vec![(commit("c1", 1, 5, "alice"), vec![add("A.java", 1)])],
        );
        vcs.fail_on = Some("c1".into());
        let err = HistoryReconstructor::new(&tl, &vcs)
            .compute_dataset(&grouped, &[])
            .unwrap_err();
        assert!(matches!(err, Error::DiffRetrieval { .. }));
    }

    #[test]
    fn test_group_commits_by_release() {
        let tl = timeline(2);
        let commits = vec![
            commit("b", 2, 1, "x"),
            commit("a", 1, 28, "x"),
            commit("late", 3, 1, "x"),
        ];
        let (grouped, dropped) = group_commits_by_release(&tl, commits).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(grouped["v1"].len(), 1);
        assert_eq!(grouped["v2"][0].id, "b");
    }
}
