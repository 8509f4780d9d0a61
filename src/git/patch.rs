//! Tree-to-tree diffs turned into [`DiffEvent`]s.

use git2::{Delta, Diff, DiffFindOptions, DiffOptions, Oid, Patch, Repository, Tree};

use crate::core::{Commit, Error, Result};
use crate::history::{DiffEvent, Edit, PathFilter};

fn tree_of<'r>(repo: &'r Repository, commit: &Commit) -> std::result::Result<Tree<'r>, git2::Error> {
    let oid = Oid::from_str(&commit.id)?;
    repo.find_commit(oid)?.tree()
}

/// Diff two commits with rename (and optionally copy) detection.
///
/// Any libgit2 failure is reported as [`Error::DiffRetrieval`].
pub(super) fn diff_commits(
    repo: &Repository,
    previous: Option<&Commit>,
    current: &Commit,
    detect_copies: bool,
    filter: Option<&PathFilter>,
) -> Result<Vec<DiffEvent>> {
    let from = previous.map_or("<root>", |c| c.short_id.as_str());
    let fail = |e: git2::Error| Error::diff_retrieval(from, &current.short_id, e.message());

    let new_tree = tree_of(repo, current).map_err(fail)?;
    let old_tree = previous
        .map(|c| tree_of(repo, c))
        .transpose()
        .map_err(fail)?;

    let mut opts = DiffOptions::new();
    opts.context_lines(0);
    let mut diff = repo
        .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), Some(&mut opts))
        .map_err(fail)?;

    let mut find = DiffFindOptions::new();
    find.renames(true);
    find.copies(detect_copies);
    diff.find_similar(Some(&mut find)).map_err(fail)?;

    let mut events = Vec::new();
    for (i, delta) in diff.deltas().enumerate() {
        let old_path = delta
            .old_file()
            .path()
            .map(|p| p.to_string_lossy().replace('\\', "/"));
        let new_path = delta
            .new_file()
            .path()
            .map(|p| p.to_string_lossy().replace('\\', "/"));

        let event = match (delta.status(), old_path, new_path) {
            (Delta::Added, _, Some(path)) => DiffEvent::Add {
                path,
                edits: Vec::new(),
            },
            (Delta::Deleted, Some(path), _) => DiffEvent::Delete { path },
            (Delta::Modified, _, Some(path)) => DiffEvent::Modify {
                path,
                edits: Vec::new(),
            },
            (Delta::Renamed, Some(from), Some(to)) => DiffEvent::Rename { from, to },
            (Delta::Copied, Some(from), Some(to)) => DiffEvent::Copy { from, to },
            _ => continue,
        };

        let event = match filter {
            Some(filter) => match filter.restrict(event) {
                Some(event) => event,
                None => continue,
            },
            None => event,
        };

        let event = match event {
            DiffEvent::Add { path, .. } if delta.status() == Delta::Added => DiffEvent::Add {
                path,
                edits: edits(&diff, i).map_err(fail)?,
            },
            // renamed or copied in from an untracked path
            DiffEvent::Add { path, .. } => DiffEvent::Add {
                path,
                edits: whole_file(repo, delta.new_file().id()).map_err(fail)?,
            },
            DiffEvent::Modify { path, .. } => DiffEvent::Modify {
                path,
                edits: edits(&diff, i).map_err(fail)?,
            },
            other => other,
        };
        events.push(event);
    }

    Ok(events)
}

/// A single insert covering every line of a blob.
fn whole_file(repo: &Repository, id: Oid) -> std::result::Result<Vec<Edit>, git2::Error> {
    let blob = repo.find_blob(id)?;
    if blob.is_binary() {
        return Ok(Vec::new());
    }
    let content = blob.content();
    let mut lines = content.iter().filter(|&&b| b == b'\n').count();
    if content.last().is_some_and(|&b| b != b'\n') {
        lines += 1;
    }
    Ok(Edit::from_run(0, u32::try_from(lines).unwrap_or(u32::MAX))
        .into_iter()
        .collect())
}

/// Edit regions of one delta: each run of removed lines followed by added
/// lines becomes one edit. Binary deltas have none.
fn edits(diff: &Diff<'_>, index: usize) -> std::result::Result<Vec<Edit>, git2::Error> {
    let Some(patch) = Patch::from_diff(diff, index)? else {
        return Ok(Vec::new());
    };

    let mut edits = Vec::new();
    for hunk in 0..patch.num_hunks() {
        let (mut removed, mut added) = (0u32, 0u32);
        for line in 0..patch.num_lines_in_hunk(hunk)? {
            match patch.line_in_hunk(hunk, line)?.origin() {
                '-' => {
                    if added > 0 {
                        edits.extend(Edit::from_run(removed, added));
                        (removed, added) = (0, 0);
                    }
                    removed += 1;
                }
                '+' => added += 1,
                _ => {
                    edits.extend(Edit::from_run(removed, added));
                    (removed, added) = (0, 0);
                }
            }
        }
        edits.extend(Edit::from_run(removed, added));
    }
    Ok(edits)
}
