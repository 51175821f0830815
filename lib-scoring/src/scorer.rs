//! Contribution scoring
//!
//! A user's contribution score for one period is the weighted sum of their
//! network share along three dimensions: game coins earned, compute
//! contributed, and transaction volume. Shares lie in [0, 1] and the
//! configured weights sum to 1, so every score lies in [0, 1] and the
//! network-wide total never exceeds 1.

use lib_params::EconomicParams;
use lib_types::{Amount, UserId};
use serde::{Deserialize, Serialize};

use crate::metrics::UserMetrics;

/// Scores are multiplied by this before the minimum-score comparison
pub const SCORE_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredUser {
    pub user: UserId,
    pub score: f64,
}

/// Score every user against the period's network totals.
///
/// Output order matches input order. Scores below the configured floor are
/// zeroed so that negligible contributions never produce dust payouts.
pub fn score_users(entries: &[UserMetrics], params: &EconomicParams) -> Vec<ScoredUser> {
    let mut total_coins: Amount = 0;
    let mut total_compute: Amount = 0;
    let mut total_tx: Amount = 0;
    for entry in entries {
        total_coins = total_coins.saturating_add(entry.activity.game_coins_earned);
        total_compute = total_compute.saturating_add(entry.activity.compute_contributed);
        total_tx = total_tx.saturating_add(entry.activity.tx_volume);
    }

    entries
        .iter()
        .map(|entry| {
            let raw = params.weight_coin * share(entry.activity.game_coins_earned, total_coins)
                + params.weight_compute * share(entry.activity.compute_contributed, total_compute)
                + params.weight_tx * share(entry.activity.tx_volume, total_tx);
            ScoredUser {
                user: entry.user,
                score: apply_floor(raw, params.min_scaled_score),
            }
        })
        .collect()
}

/// Network share of one dimension. A dimension nobody contributed to is
/// zero for everyone, never a division by zero.
fn share(value: Amount, total: Amount) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 / total as f64
    }
}

/// Zero out scores too small to matter once scaled
fn apply_floor(score: f64, min_scaled_score: f64) -> f64 {
    if score * SCORE_SCALE < min_scaled_score {
        0.0
    } else {
        score
    }
}
