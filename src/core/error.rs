//! Error types for the defectset library.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias using defectset's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a dataset.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A date falls after every known release.
    ///
    /// Expected and frequent (work on the unreleased head); callers drop the
    /// record that carried the date.
    #[error("No release found for date {date}")]
    NoReleaseFound { date: NaiveDate },

    /// A release id that the timeline does not know.
    #[error("Unknown release: {id}")]
    UnknownRelease { id: String },

    /// No commit references the defect.
    #[error("No commit references defect {key}")]
    UnresolvableDefect { key: String },

    /// Reading the diff between two commits failed. Fatal for the whole run.
    #[error("Diff retrieval failed between {from} and {to}: {message}")]
    DiffRetrieval {
        from: String,
        to: String,
        message: String,
    },

    /// Git operation error.
    #[error("Git error: {0}")]
    Git(String),

    /// Issue tracker (HTTP) error.
    #[error("Issue tracker error: {0}")]
    Http(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input data that cannot be used (empty timeline, malformed dates).
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Self::Git(err.message().to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl Error {
    /// Create a new git error.
    pub fn git(message: impl Into<String>) -> Self {
        Self::Git(message.into())
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new issue tracker error.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http(message.into())
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Create a diff retrieval error for the pair `from..to`.
    pub fn diff_retrieval(
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DiffRetrieval {
            from: from.into(),
            to: to.into(),
            message: message.into(),
        }
    }

    /// Whether the run must abort on this error rather than drop a record.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::NoReleaseFound { .. } | Self::UnresolvableDefect { .. }
        )
    }
}
