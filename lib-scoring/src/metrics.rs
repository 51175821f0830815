//! Per-user activity and performance inputs

use lib_types::{Amount, UserId};
use serde::{Deserialize, Serialize};

/// Raw activity measured over one settlement period, in atomic units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    /// In-game coins earned
    pub game_coins_earned: Amount,
    /// Compute credits contributed to the platform
    pub compute_contributed: Amount,
    /// Marketplace transaction volume in cash units
    pub tx_volume: Amount,
}

impl ActivityMetrics {
    pub fn new(game_coins_earned: Amount, compute_contributed: Amount, tx_volume: Amount) -> Self {
        Self {
            game_coins_earned,
            compute_contributed,
            tx_volume,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.game_coins_earned == 0 && self.compute_contributed == 0 && self.tx_volume == 0
    }
}

/// Qualitative performance sub-scores, each expected in [0, 1].
///
/// Out-of-range or NaN inputs are clipped at read time, never trusted raw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScores {
    pub revenue: f64,
    pub referrals: f64,
    pub development: f64,
    pub management: f64,
    pub marketing: f64,
}

impl PerformanceScores {
    pub const DIMENSIONS: usize = 5;

    pub fn new(revenue: f64, referrals: f64, development: f64, management: f64, marketing: f64) -> Self {
        Self {
            revenue,
            referrals,
            development,
            management,
            marketing,
        }
    }

    /// Every sub-score clamped to [0, 1]; NaN becomes 0
    pub fn clipped(&self) -> Self {
        Self {
            revenue: clip(self.revenue),
            referrals: clip(self.referrals),
            development: clip(self.development),
            management: clip(self.management),
            marketing: clip(self.marketing),
        }
    }

    /// Mean of the clipped sub-scores, in [0, 1]
    pub fn mean(&self) -> f64 {
        let c = self.clipped();
        (c.revenue + c.referrals + c.development + c.management + c.marketing)
            / Self::DIMENSIONS as f64
    }
}

fn clip(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Everything the platform knows about one user for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserMetrics {
    pub user: UserId,
    pub activity: ActivityMetrics,
    /// Present only for users with reviewed performance this period
    pub performance: Option<PerformanceScores>,
}

impl UserMetrics {
    pub fn new(user: UserId, activity: ActivityMetrics) -> Self {
        Self {
            user,
            activity,
            performance: None,
        }
    }

    pub fn with_performance(mut self, performance: PerformanceScores) -> Self {
        self.performance = Some(performance);
        self
    }
}
