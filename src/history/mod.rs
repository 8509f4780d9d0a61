//! History reconstruction: from commits and resolved defects to labelled
//! (release, file) instances.

mod dataset;
mod diff;
mod filter;
mod instance;
mod reconstructor;
mod state;

pub use dataset::{dedupe_by_release, Dataset, Snapshot};
pub use diff::{DiffEvent, Edit, EditKind, LineCounts};
pub use filter::PathFilter;
pub use instance::FileInstance;
pub use reconstructor::{group_commits_by_release, CommitsByRelease, HistoryReconstructor};
pub use state::ReconstructionState;
