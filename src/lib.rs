//! defectset - labelled defect-prediction datasets from an issue tracker
//! and a git history.
//!
//! Released versions and fixed bugs come from Jira; every commit up to the
//! last release is replayed to rebuild one instance per (file, release)
//! pair with size, churn and ownership metrics. An instance is labelled
//! buggy when a later fix touched the file and the defect affected that
//! release. Affected versions missing from the tracker are estimated with
//! the incremental proportion method.
//!
//! # Example
//!
//! ```no_run
//! use defectset::git::GitRepo;
//! use defectset::jira::JiraClient;
//! use defectset::pipeline::Pipeline;
//!
//! let jira = JiraClient::new("https://issues.apache.org/jira", 1000).unwrap();
//! let repo = GitRepo::open("bookkeeper").unwrap();
//! let dataset = Pipeline::new(&jira, &jira, &repo).run("BOOKKEEPER").unwrap();
//! println!("{} rows, {} buggy", dataset.instances.len(), dataset.buggy_count());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod defects;
pub mod git;
pub mod history;
pub mod jira;
pub mod output;
pub mod pipeline;
pub mod timeline;

pub use core::{Error, Result};
pub use history::Dataset;
pub use pipeline::Pipeline;
