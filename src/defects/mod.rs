//! Defect resolution: fix commits, injected/affected versions, and the
//! commit-to-defect lookup used during history reconstruction.

mod fix_commit;
mod proportion;
mod versions;

use std::collections::HashMap;

use crate::core::DefectRecord;

pub use fix_commit::{FixCommitResolver, TicketPattern};
pub use proportion::ProportionEstimator;
pub use versions::{AffectedVersionsCheck, DefectVersionResolver, InvalidReason};

/// Lookup from commit id to the defects that commit is bound to
/// (as fix commit or as another referencing commit).
#[derive(Debug, Default)]
pub struct DefectIndex<'a> {
    defects: &'a [DefectRecord],
    by_commit: HashMap<&'a str, Vec<usize>>,
}

impl<'a> DefectIndex<'a> {
    pub fn new(defects: &'a [DefectRecord]) -> Self {
        let mut by_commit: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (i, defect) in defects.iter().enumerate() {
            for id in defect.commit_ids() {
                let bound = by_commit.entry(id).or_default();
                if bound.last() != Some(&i) {
                    bound.push(i);
                }
            }
        }
        Self { defects, by_commit }
    }

    /// Defects resolved (fully or partly) by the commit `id`.
    pub fn for_commit(&self, id: &str) -> impl Iterator<Item = &'a DefectRecord> + '_ {
        let defects = self.defects;
        self.by_commit
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| &defects[i])
    }

    pub fn len(&self) -> usize {
        self.defects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defects.is_empty()
    }
}
