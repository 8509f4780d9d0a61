//! Incremental proportion statistic.
//!
//! `P = (FV - IV) / (FV - OV)` in release-index units. The running mean is
//! learned only from defects whose affected versions are ground truth and is
//! used to predict `IV = FV - P * (FV - OV)` for the others.

use serde::{Deserialize, Serialize};

/// Running mean of the proportion statistic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProportionEstimator {
    aggregate: f64,
    samples: usize,
}

impl ProportionEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one ground-truth defect into the mean.
    ///
    /// Returns the proportion of this defect, or `None` when the opening and
    /// fix versions coincide (zero distance carries no information).
    pub fn observe(&mut self, injected: usize, opening: usize, fix: usize) -> Option<f64> {
        if fix == opening {
            return None;
        }
        let p = (fix as f64 - injected as f64) / (fix as f64 - opening as f64);
        self.aggregate += p;
        self.samples += 1;
        Some(p)
    }

    /// Current mean; 0 before any observation.
    pub fn mean(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.aggregate / self.samples as f64
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn aggregate(&self) -> f64 {
        self.aggregate
    }

    /// `floor(fix - mean * (fix - opening))`, clamped to `>= 0`.
    pub fn estimate_injected_index(&self, opening: usize, fix: usize) -> usize {
        let estimate = (fix as f64 - self.mean() * (fix as f64 - opening as f64)).floor();
        if estimate <= 0.0 {
            0
        } else {
            estimate as usize
        }
    }
}
