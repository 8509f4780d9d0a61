//! File-level diff events between two consecutive commits.

use serde::{Deserialize, Serialize};

/// Kind of a contiguous edit region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Insert,
    Delete,
    Replace,
}

/// One edit region: `old_len` lines of the old file became `new_len` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub kind: EditKind,
    pub old_len: u32,
    pub new_len: u32,
}

impl Edit {
    pub fn insert(lines: u32) -> Self {
        Self {
            kind: EditKind::Insert,
            old_len: 0,
            new_len: lines,
        }
    }

    pub fn delete(lines: u32) -> Self {
        Self {
            kind: EditKind::Delete,
            old_len: lines,
            new_len: 0,
        }
    }

    pub fn replace(old_len: u32, new_len: u32) -> Self {
        Self {
            kind: EditKind::Replace,
            old_len,
            new_len,
        }
    }

    /// Build an edit from a run of removed and added lines.
    pub fn from_run(removed: u32, added: u32) -> Option<Self> {
        match (removed, added) {
            (0, 0) => None,
            (0, n) => Some(Self::insert(n)),
            (n, 0) => Some(Self::delete(n)),
            (r, a) => Some(Self::replace(r, a)),
        }
    }
}

/// Added/deleted line counts derived from an edit list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub added: u32,
    pub deleted: u32,
}

impl LineCounts {
    /// Sum an edit list. A replace counts as added lines when it grew the
    /// file and as deleted lines otherwise.
    pub fn from_edits(edits: &[Edit]) -> Self {
        edits.iter().fold(Self::default(), |mut acc, edit| {
            match edit.kind {
                EditKind::Insert => acc.added += edit.new_len.saturating_sub(edit.old_len),
                EditKind::Delete => acc.deleted += edit.old_len.saturating_sub(edit.new_len),
                EditKind::Replace if edit.new_len > edit.old_len => {
                    acc.added += edit.new_len - edit.old_len
                }
                EditKind::Replace => acc.deleted += edit.old_len - edit.new_len,
            }
            acc
        })
    }

    pub fn touched(&self) -> u32 {
        self.added + self.deleted
    }

    /// `added - deleted`.
    pub fn churn(&self) -> i64 {
        i64::from(self.added) - i64::from(self.deleted)
    }
}

/// A single file change between two commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiffEvent {
    Add { path: String, edits: Vec<Edit> },
    Copy { from: String, to: String },
    Delete { path: String },
    Modify { path: String, edits: Vec<Edit> },
    Rename { from: String, to: String },
}

impl DiffEvent {
    /// Every path the event names (old side first).
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Self::Add { path, .. } | Self::Delete { path } | Self::Modify { path, .. } => {
                vec![path.as_str()]
            }
            Self::Copy { from, to } | Self::Rename { from, to } => vec![from.as_str(), to.as_str()],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Copy { .. } => "copy",
            Self::Delete { .. } => "delete",
            Self::Modify { .. } => "modify",
            Self::Rename { .. } => "rename",
        }
    }
}
