//! Issue tracker access: released versions and fixed bugs from Jira.

mod model;

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::JiraConfig;
use crate::core::{Error, Release, Result};

pub use model::{
    parse_date, parse_search_page, parse_version_page, releases_from_page, ticket_from_issue,
    Issue, IssueFields, SearchPage, TicketBatch, VersionEntry, VersionPage,
};

/// Source of dated releases for a project.
pub trait ReleaseSource {
    fn list_releases(&self, project: &str) -> Result<Vec<Release>>;
}

/// Source of fixed-bug tickets for a project. Records that cannot be
/// turned into tickets are counted in the batch, not returned.
pub trait DefectSource {
    fn list_fixed_defects(&self, project: &str) -> Result<TicketBatch>;
}

/// JQL selecting closed or resolved bugs with resolution "fixed".
pub fn fixed_bugs_jql(project: &str) -> String {
    format!(
        r#"project = "{project}" AND issueType = "Bug" AND (status = "closed" OR status = "resolved") AND resolution = "fixed""#
    )
}

/// Blocking Jira REST client.
pub struct JiraClient {
    base_url: String,
    page_size: usize,
    client: reqwest::blocking::Client,
}

impl JiraClient {
    pub fn new(base_url: impl Into<String>, page_size: usize) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("defectset/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: page_size.max(1),
            client,
        })
    }

    pub fn from_config(config: &JiraConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.page_size)
    }

    pub fn versions_url(&self, project: &str, start_at: usize) -> Result<Url> {
        let base = format!("{}/rest/api/2/project/{project}/version", self.base_url);
        Url::parse_with_params(
            &base,
            &[
                ("maxResults", self.page_size.to_string()),
                ("startAt", start_at.to_string()),
            ],
        )
        .map_err(|e| Error::config(format!("invalid Jira URL {base}: {e}")))
    }

    pub fn search_url(&self, project: &str, start_at: usize) -> Result<Url> {
        let base = format!("{}/rest/api/2/search", self.base_url);
        Url::parse_with_params(
            &base,
            &[
                ("jql", fixed_bugs_jql(project)),
                ("fields", "key,resolutiondate,versions,created".to_string()),
                ("maxResults", self.page_size.to_string()),
                ("startAt", start_at.to_string()),
            ],
        )
        .map_err(|e| Error::config(format!("invalid Jira URL {base}: {e}")))
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .map_err(|e| Error::http(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::http(format!("Jira returned {status} for {url}: {body}")));
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ReleaseSource for JiraClient {
    fn list_releases(&self, project: &str) -> Result<Vec<Release>> {
        let mut releases = Vec::new();
        let mut start_at = 0;
        loop {
            let page: VersionPage = self.get_json(self.versions_url(project, start_at)?)?;
            releases.extend(releases_from_page(&page));
            if page.is_last || page.values.is_empty() {
                break;
            }
            start_at += page.values.len();
        }
        tracing::info!(project, releases = releases.len(), "fetched releases");
        Ok(releases)
    }
}

impl DefectSource for JiraClient {
    fn list_fixed_defects(&self, project: &str) -> Result<TicketBatch> {
        let mut batch = TicketBatch::default();
        let mut start_at = 0;
        loop {
            let page: SearchPage = self.get_json(self.search_url(project, start_at)?)?;
            batch.append(TicketBatch::from_page(&page));
            start_at += page.issues.len();
            if page.issues.is_empty() || start_at >= page.total {
                break;
            }
        }
        tracing::info!(
            project,
            tickets = batch.tickets.len(),
            malformed = batch.malformed,
            "fetched fixed bugs"
        );
        Ok(batch)
    }
}
