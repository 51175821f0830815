//! Immutable per-period contribution snapshots
//!
//! The settlement engine writes exactly one snapshot per scored user per
//! period. Later periods supersede, never mutate, earlier ones; the dividend
//! calculator folds over this history.

use lib_types::{PeriodId, UserId};
use serde::{Deserialize, Serialize};

use crate::metrics::{ActivityMetrics, PerformanceScores};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionSnapshot {
    pub user: UserId,
    pub period: PeriodId,
    /// Raw activity the score was computed from
    pub activity: ActivityMetrics,
    /// Contribution score for this period, in [0, 1]
    pub score: f64,
    /// Reviewed performance sub-scores, when the period had a review
    pub performance: Option<PerformanceScores>,
    /// Unix seconds when the settlement recorded this snapshot
    pub recorded_at: u64,
}

impl ContributionSnapshot {
    pub fn new(
        user: UserId,
        period: PeriodId,
        activity: ActivityMetrics,
        score: f64,
        performance: Option<PerformanceScores>,
        recorded_at: u64,
    ) -> Self {
        Self {
            user,
            period,
            activity,
            score,
            performance,
            recorded_at,
        }
    }

    /// Period score used by the dividend calculator: mean of the clipped
    /// performance sub-scores, zero when the period had no review
    pub fn period_score(&self) -> f64 {
        self.performance.map(|p| p.mean()).unwrap_or(0.0)
    }
}
