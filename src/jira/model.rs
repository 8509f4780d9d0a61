//! Jira REST payloads and their conversion into domain records.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::{DefectTicket, Error, Release, Result};

/// One page of `/rest/api/2/project/{key}/version`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionPage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "default_true")]
    pub is_last: bool,
    #[serde(default)]
    pub values: Vec<VersionEntry>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub name: String,
    #[serde(default)]
    pub released: bool,
    pub release_date: Option<String>,
}

/// One page of `/rest/api/2/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueFields {
    pub created: String,
    pub resolutiondate: Option<String>,
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

pub fn parse_version_page(body: &str) -> Result<VersionPage> {
    Ok(serde_json::from_str(body)?)
}

pub fn parse_search_page(body: &str) -> Result<SearchPage> {
    Ok(serde_json::from_str(body)?)
}

/// Calendar date from a Jira timestamp such as `2013-05-21T10:13:50.000+0000`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| Error::invalid_data(format!("bad date {raw:?}: {e}")))
}

/// Released versions with a usable release date.
pub fn releases_from_page(page: &VersionPage) -> Vec<Release> {
    page.values
        .iter()
        .filter(|v| v.released)
        .filter_map(|v| {
            let raw = v.release_date.as_deref()?;
            match parse_date(raw) {
                Ok(date) => Some(Release::new(v.name.clone(), date)),
                Err(e) => {
                    tracing::warn!(version = %v.name, error = %e, "skipping version");
                    None
                }
            }
        })
        .collect()
}

/// Ticket record for one fixed bug. Unreleased affected versions are not
/// kept since they can never be on the timeline.
pub fn ticket_from_issue(issue: &Issue) -> Result<DefectTicket> {
    let resolved = issue
        .fields
        .resolutiondate
        .as_deref()
        .ok_or_else(|| Error::invalid_data(format!("{} has no resolution date", issue.key)))?;

    Ok(DefectTicket {
        key: issue.key.clone(),
        opened: parse_date(&issue.fields.created)?,
        fixed: parse_date(resolved)?,
        affected_versions: issue
            .fields
            .versions
            .iter()
            .filter(|v| v.released)
            .map(|v| v.name.clone())
            .collect(),
    })
}

/// Tickets gathered from the search endpoint, plus the number of issues
/// that could not be converted (missing or unparsable dates).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketBatch {
    pub tickets: Vec<DefectTicket>,
    pub malformed: usize,
}

impl TicketBatch {
    pub fn from_page(page: &SearchPage) -> Self {
        let mut batch = Self::default();
        for issue in &page.issues {
            match ticket_from_issue(issue) {
                Ok(ticket) => batch.tickets.push(ticket),
                Err(e) => {
                    tracing::warn!(ticket = %issue.key, error = %e, "skipping malformed ticket");
                    batch.malformed += 1;
                }
            }
        }
        batch
    }

    pub fn append(&mut self, other: TicketBatch) {
        self.tickets.extend(other.tickets);
        self.malformed += other.malformed;
    }

    /// Issues received, converted or not.
    pub fn received(&self) -> usize {
        self.tickets.len() + self.malformed
    }
}

impl From<Vec<DefectTicket>> for TicketBatch {
    fn from(tickets: Vec<DefectTicket>) -> Self {
        Self {
            tickets,
            malformed: 0,
        }
    }
}
