//! Historical weight math
//!
//! Pure functions: a decayed mean turns a user's snapshot history into one
//! historical score, and a capped normalization turns all scores into pool
//! weights. Weights are expressed in parts per million, floored so the sum
//! across users never exceeds the whole.

use lib_scoring::ContributionSnapshot;
use lib_types::{Bps, PeriodId, UserId, BPS_SCALE, PPM_SCALE};

/// Decay-weighted mean of per-period performance over the trailing window.
///
/// A snapshot one period before `period` carries full weight, each period
/// further back multiplies by `decay`. Snapshots outside the window (or not
/// strictly before `period`) are ignored. Missing periods shrink the
/// denominator instead of counting as zero, but a snapshot without reviewed
/// performance counts as a zero score.
pub fn historical_score(
    snapshots: &[ContributionSnapshot],
    period: PeriodId,
    decay: f64,
    window_periods: u32,
) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for snapshot in snapshots {
        let periods_ago = period.days_since(snapshot.period);
        if periods_ago < 1 || periods_ago > window_periods as i64 {
            continue;
        }
        let time_weight = decay.powi((periods_ago - 1) as i32);
        weighted += snapshot.period_score() * time_weight;
        total_weight += time_weight;
    }
    if total_weight == 0.0 {
        0.0
    } else {
        weighted / total_weight
    }
}

/// Normalize historical scores into capped pool weights.
///
/// Each weight is `min(score / total, cap)`, floored into parts per million
/// so the weight sum stays at or under one whole pool even after rounding.
/// An all-zero score set yields all-zero weights.
pub fn normalize_weights(scores: &[(UserId, f64)], cap_bps: Bps) -> Vec<(UserId, u64)> {
    let total: f64 = scores.iter().map(|(_, score)| score.max(0.0)).sum();
    let cap = cap_bps as f64 / BPS_SCALE as f64;

    scores
        .iter()
        .map(|(user, score)| {
            let weight = if total == 0.0 {
                0.0
            } else {
                (score.max(0.0) / total).min(cap)
            };
            (*user, (weight * PPM_SCALE as f64) as u64)
        })
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Every weight stays within the cap and the weight sum never
        // exceeds one whole pool.
        #[test]
        fn prop_weights_capped_and_conserved(
            raw_scores in prop::collection::vec(0.0f64..10.0, 1..30),
            cap_bps in 1u16..=10_000u16,
        ) {
            let scores: Vec<(UserId, f64)> = raw_scores
                .iter()
                .enumerate()
                .map(|(i, score)| (UserId::new([i as u8; 32]), *score))
                .collect();

            let weights = normalize_weights(&scores, cap_bps);

            let cap_ppm = cap_bps as u64 * 100;
            let mut sum: u64 = 0;
            for (_, weight_ppm) in &weights {
                prop_assert!(*weight_ppm <= cap_ppm);
                sum += weight_ppm;
            }
            prop_assert!(sum <= PPM_SCALE);
        }
    }
}
