//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::history::PathFilter;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub jira: JiraConfig,
    pub git: GitConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Use this for explicit `--config` flags.
    /// Env vars with `DEFECTSET_` prefix override file values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::file_exact(path)))
    }

    /// Load configuration from directory, looking for defectset.toml or
    /// .defectset/defectset.toml.
    ///
    /// Missing files are silently skipped (defaults are used).
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Self::extract(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(dir.join("defectset.toml")))
                .merge(Toml::file(dir.join(".defectset/defectset.toml"))),
        )
    }

    fn extract(figment: Figment) -> Result<Self> {
        figment
            .merge(Env::prefixed("DEFECTSET_").split("__"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))
    }

    /// Project key, required for any tracker access.
    pub fn project_key(&self) -> Result<&str> {
        match self.project.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::config(
                "no project key: pass --project or set project.key",
            )),
        }
    }

    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(&self.filter.extensions).with_exclude_tests(self.filter.exclude_tests)
    }
}

/// Issue-tracker project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Jira project key (e.g. `BOOKKEEPER`).
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    pub base_url: String,
    /// Results requested per page.
    pub page_size: usize,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: "https://issues.apache.org/jira".to_string(),
            page_size: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Path to the repository (or any directory inside it).
    pub repo: PathBuf,
    /// Report copies as well as renames.
    pub detect_copies: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            detect_copies: true,
        }
    }
}

/// Which files become dataset rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub extensions: Vec<String>,
    pub exclude_tests: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["java".to_string()],
            exclude_tests: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the dataset files.
    pub dir: PathBuf,
    pub format: OutputFormat,
    /// Emit every release instead of the first-half horizon.
    pub full_history: bool,
    /// Write one file per first-half snapshot.
    pub write_snapshots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            format: OutputFormat::Csv,
            full_history: false,
            write_snapshots: true,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Weka attribute-relation file.
    Arff,
    /// JSON document.
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Arff => "arff",
            Self::Json => "json",
        }
    }
}
