//! Domain records shared by the timeline, the defect resolvers and the
//! history reconstruction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A dated milestone of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release name as the issue tracker reports it (e.g. `1.2.0`).
    pub id: String,
    /// Calendar date of the release.
    pub date: NaiveDate,
}

impl Release {
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
        }
    }
}

/// Read-only projection of a VCS revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full object id.
    pub id: String,
    /// Abbreviated object id.
    pub short_id: String,
    /// Commit (committer) timestamp.
    pub date: DateTime<Utc>,
    /// Author name.
    pub author: String,
    /// Author timestamp, used as the creation date of added files.
    pub authored: DateTime<Utc>,
    /// Full commit message.
    pub message: String,
}

impl Commit {
    /// Calendar day of the commit timestamp.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Calendar day of the author timestamp.
    pub fn authored_day(&self) -> NaiveDate {
        self.authored.date_naive()
    }
}

/// Raw fixed-bug ticket as delivered by the defect source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectTicket {
    pub key: String,
    pub opened: NaiveDate,
    pub fixed: NaiveDate,
    /// Affected versions declared on the ticket; may be empty.
    pub affected_versions: Vec<String>,
}

/// A defect progressively enriched with its fix commit and versions.
///
/// Created from a [`DefectTicket`]; the fix-commit resolver fills
/// `fix_commit`/`other_commits`, the version resolver fills the
/// `*_version` fields and `affected_versions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefectRecord {
    pub key: String,
    pub opened: NaiveDate,
    pub fixed: NaiveDate,
    pub declared_affected: Vec<String>,
    pub opening_version: Option<String>,
    pub fix_version: Option<String>,
    pub injected_version: Option<String>,
    /// Releases believed to contain the defect, in timeline order. Never
    /// contains the fix version.
    pub affected_versions: Vec<String>,
    /// True when the injected version came from the proportion estimate.
    pub estimated: bool,
    pub fix_commit: Option<Commit>,
    pub other_commits: Vec<Commit>,
}

impl DefectRecord {
    pub fn new(
        key: impl Into<String>,
        opened: NaiveDate,
        fixed: NaiveDate,
        declared_affected: Vec<String>,
    ) -> Self {
        Self {
            key: key.into(),
            opened,
            fixed,
            declared_affected,
            opening_version: None,
            fix_version: None,
            injected_version: None,
            affected_versions: Vec::new(),
            estimated: false,
            fix_commit: None,
            other_commits: Vec::new(),
        }
    }

    /// Ids of every commit bound to this defect (fix commit first).
    pub fn commit_ids(&self) -> impl Iterator<Item = &str> {
        self.fix_commit
            .iter()
            .chain(self.other_commits.iter())
            .map(|c| c.id.as_str())
    }
}

impl From<DefectTicket> for DefectRecord {
    fn from(ticket: DefectTicket) -> Self {
        Self::new(
            ticket.key,
            ticket.opened,
            ticket.fixed,
            ticket.affected_versions,
        )
    }
}
