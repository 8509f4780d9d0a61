//! Opening, fix, injected and affected versions of each defect.

use std::collections::HashSet;

use crate::core::{DefectRecord, Diagnostics, Error, Result};
use crate::timeline::ReleaseTimeline;

use super::ProportionEstimator;

/// Why a declared affected-version set was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Nothing declared.
    Missing,
    /// The fix version is listed as affected.
    ContainsFixVersion,
    /// None of the declared versions is on the timeline.
    NoKnownRelease,
    /// The earliest declared version is dated after the opening version.
    InjectedAfterOpening,
}

/// Outcome of validating declared affected versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffectedVersionsCheck {
    /// Ground truth: the injected version and the known affected versions
    /// in timeline order.
    Valid {
        injected: String,
        affected: Vec<String>,
    },
    Invalid(InvalidReason),
}

/// Assigns versions to defects, learning the proportion statistic from
/// ground-truth defects as it goes.
pub struct DefectVersionResolver<'a> {
    timeline: &'a ReleaseTimeline,
    estimator: ProportionEstimator,
}

impl<'a> DefectVersionResolver<'a> {
    pub fn new(timeline: &'a ReleaseTimeline) -> Self {
        Self {
            timeline,
            estimator: ProportionEstimator::new(),
        }
    }

    /// Start from an already-trained estimator.
    pub fn with_estimator(mut self, estimator: ProportionEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn estimator(&self) -> &ProportionEstimator {
        &self.estimator
    }

    /// Resolve versions for every defect.
    ///
    /// Defects are processed in fix-date order so each estimate only sees
    /// evidence from earlier fixes. Defects whose opening or fix date has no
    /// release are dropped and counted.
    pub fn resolve(&mut self, mut defects: Vec<DefectRecord>) -> Result<(Vec<DefectRecord>, Diagnostics)> {
        defects.sort_by_key(|d| d.fixed);

        let mut diagnostics = Diagnostics::default();
        let mut kept = Vec::with_capacity(defects.len());
        for mut defect in defects {
            match self.resolve_one(&mut defect, &mut diagnostics) {
                Ok(()) => kept.push(defect),
                Err(e) if !e.is_fatal() => {
                    tracing::warn!(defect = %defect.key, "dropping defect: {e}");
                    diagnostics.defects_without_release += 1;
                }
                Err(e) => return Err(e),
            }
        }

        diagnostics.defects_kept = kept.len();
        diagnostics.proportion = self.estimator.mean();
        tracing::info!(
            kept = kept.len(),
            estimated = diagnostics.proportion_estimated,
            proportion = self.estimator.mean(),
            "defect versions resolved"
        );
        Ok((kept, diagnostics))
    }

    fn resolve_one(&mut self, defect: &mut DefectRecord, diagnostics: &mut Diagnostics) -> Result<()> {
        let opening = self.timeline.find_release_for_date(defect.opened)?.id.clone();
        let fix = self.timeline.find_release_for_date(defect.fixed)?.id.clone();
        let opening_idx = self.position(&opening)?;
        let fix_idx = self.position(&fix)?;

        defect.opening_version = Some(opening.clone());
        defect.fix_version = Some(fix.clone());

        match self.check_affected_versions(&defect.declared_affected, &opening, &fix) {
            AffectedVersionsCheck::Valid { injected, affected } => {
                let injected_idx = self.position(&injected)?;
                self.estimator.observe(injected_idx, opening_idx, fix_idx);
                defect.injected_version = Some(injected);
                defect.affected_versions = affected;
                defect.estimated = false;
            }
            AffectedVersionsCheck::Invalid(reason) => {
                if reason != InvalidReason::Missing {
                    diagnostics.invalid_affected_versions += 1;
                    tracing::debug!(defect = %defect.key, ?reason, "declared affected versions rejected");
                }
                diagnostics.proportion_estimated += 1;

                let injected_idx = self
                    .estimator
                    .estimate_injected_index(opening_idx, fix_idx)
                    .min(fix_idx);
                defect.injected_version = self.timeline.at(injected_idx).map(|r| r.id.clone());
                defect.affected_versions = self
                    .timeline
                    .slice(injected_idx, fix_idx)
                    .iter()
                    .map(|r| r.id.clone())
                    .collect();
                defect.estimated = true;
            }
        }
        Ok(())
    }

    /// Validate a declared affected-version set against the timeline.
    pub fn check_affected_versions(
        &self,
        declared: &[String],
        opening: &str,
        fix: &str,
    ) -> AffectedVersionsCheck {
        if declared.is_empty() {
            return AffectedVersionsCheck::Invalid(InvalidReason::Missing);
        }
        if declared.iter().any(|v| v == fix) {
            return AffectedVersionsCheck::Invalid(InvalidReason::ContainsFixVersion);
        }

        let declared: HashSet<&str> = declared.iter().map(String::as_str).collect();
        let affected: Vec<String> = self
            .timeline
            .releases()
            .iter()
            .filter(|r| declared.contains(r.id.as_str()))
            .map(|r| r.id.clone())
            .collect();

        let Some(injected) = affected.first().cloned() else {
            return AffectedVersionsCheck::Invalid(InvalidReason::NoKnownRelease);
        };

        match (self.timeline.get(&injected), self.timeline.get(opening)) {
            (Some(inj), Some(open)) if inj.date > open.date => {
                AffectedVersionsCheck::Invalid(InvalidReason::InjectedAfterOpening)
            }
            _ => AffectedVersionsCheck::Valid { injected, affected },
        }
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.timeline
            .index_of(id)
            .ok_or_else(|| Error::UnknownRelease { id: id.to_string() })
    }
}
