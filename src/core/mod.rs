//! Core types shared across the crate.

mod diagnostics;
mod error;
pub mod progress;
mod types;

pub use diagnostics::Diagnostics;
pub use error::{Error, Result};
pub use types::{Commit, DefectRecord, DefectTicket, Release};
