//! Which paths take part in reconstruction.

use serde::{Deserialize, Serialize};

use super::diff::DiffEvent;

/// Keeps source files with a tracked extension, optionally skipping test code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFilter {
    extensions: Vec<String>,
    exclude_tests: bool,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(["java"])
    }
}

impl PathFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            exclude_tests: true,
        }
    }

    pub fn with_exclude_tests(mut self, exclude: bool) -> Self {
        self.exclude_tests = exclude;
        self
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_source(&self, path: &str) -> bool {
        path.rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty() && !stem.ends_with('/'))
            .is_some_and(|(_, ext)| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }

    /// A path is test code when any of its components starts with "test".
    pub fn is_test(path: &str) -> bool {
        path.split('/')
            .any(|part| part.to_ascii_lowercase().starts_with("test"))
    }

    pub fn accepts(&self, path: &str) -> bool {
        self.is_source(path) && !(self.exclude_tests && Self::is_test(path))
    }

    /// Restrict an event to the tracked set.
    ///
    /// A rename out of the tracked set removes the file, a rename or copy
    /// into it introduces the file, and a copy out of it leaves the source
    /// untouched.
    pub fn restrict(&self, event: DiffEvent) -> Option<DiffEvent> {
        match event {
            DiffEvent::Rename { from, to } => match (self.accepts(&from), self.accepts(&to)) {
                (true, true) => Some(DiffEvent::Rename { from, to }),
                (true, false) => Some(DiffEvent::Delete { path: from }),
                (false, true) => Some(DiffEvent::Add {
                    path: to,
                    edits: Vec::new(),
                }),
                (false, false) => None,
            },
            DiffEvent::Copy { from, to } => match (self.accepts(&from), self.accepts(&to)) {
                (true, true) => Some(DiffEvent::Copy { from, to }),
                (false, true) => Some(DiffEvent::Add {
                    path: to,
                    edits: Vec::new(),
                }),
                _ => None,
            },
            other => {
                let keep = other.paths().into_iter().all(|p| self.accepts(p));
                keep.then_some(other)
            }
        }
    }
}
