//! Distribution pool math
//!
//! Pure integer allocation. Scores become parts-per-million shares, shares
//! become amounts by multiply-before-divide, and the sum of allocated
//! amounts never exceeds the pool.

use lib_scoring::ScoredUser;
use lib_types::{to_ppm, Amount, Bps, UserId, BPS_SCALE, PPM_SCALE};

use crate::errors::{SettlementError, SettlementResult};

/// Pool funded from positive net income: `income * ratio`.
///
/// Non-positive income yields an empty pool.
pub fn distribution_pool(net_income: i128, ratio_bps: Bps) -> SettlementResult<Amount> {
    if net_income <= 0 {
        return Ok(0);
    }
    let scaled = (net_income as Amount)
        .checked_mul(ratio_bps as Amount)
        .ok_or(SettlementError::Overflow)?;
    Ok(scaled / BPS_SCALE)
}

/// One recipient's slice of the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShareAllocation {
    pub user: UserId,
    pub score: f64,
    /// Share of the pool in parts per million
    pub share_ppm: u64,
    pub amount: Amount,
}

/// Split `pool` across `scored` proportional to score.
///
/// Users whose slice lands below `min_payout` are dropped entirely, they do
/// not appear in the result. A zero pool or an all-zero score set allocates
/// nothing.
pub fn allocate_shares(
    pool: Amount,
    scored: &[ScoredUser],
    min_payout: Amount,
) -> SettlementResult<Vec<ShareAllocation>> {
    let mut total_ppm: u128 = 0;
    for s in scored {
        total_ppm += to_ppm(s.score) as u128;
    }
    if pool == 0 || total_ppm == 0 {
        return Ok(Vec::new());
    }

    let mut allocations = Vec::new();
    for s in scored {
        let ppm = to_ppm(s.score) as u128;
        if ppm == 0 {
            continue;
        }
        let amount = pool.checked_mul(ppm).ok_or(SettlementError::Overflow)? / total_ppm;
        if amount < min_payout {
            continue;
        }
        let share_ppm = (ppm * PPM_SCALE as u128 / total_ppm) as u64;
        allocations.push(ShareAllocation {
            user: s.user,
            score: s.score,
            share_ppm,
            amount,
        });
    }
    Ok(allocations)
}
