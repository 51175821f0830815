//! Economic Parameter Snapshot
//!
//! One validated, immutable view of every tunable number the engines read.
//! Engines take a snapshot at operation start; a governance change never
//! affects a batch that is already running.

use lib_types::{Amount, Bps, BPS_SCALE};
use serde::{Deserialize, Serialize};

use crate::errors::{ParamError, ParamResult};

// ============================================================================
// DEFAULTS
// ============================================================================

/// Share of daily net income routed to the distribution pool: 40%
pub const DEFAULT_DISTRIBUTION_RATIO_BPS: Bps = 4_000;

/// Scorer weight on game-coin earnings
pub const DEFAULT_WEIGHT_COIN: f64 = 0.4;

/// Scorer weight on compute contribution
pub const DEFAULT_WEIGHT_COMPUTE: f64 = 0.3;

/// Scorer weight on transaction volume
pub const DEFAULT_WEIGHT_TX: f64 = 0.3;

/// Scaled scores below this threshold are zeroed (dust filter)
pub const DEFAULT_MIN_SCALED_SCORE: f64 = 0.1;

/// Smallest payout worth sending to a wallet: 0.01 in display units
pub const DEFAULT_MIN_PAYOUT: Amount = 1;

/// Exponential decay per period of age in dividend weights
pub const DEFAULT_DIVIDEND_DECAY: f64 = 0.95;

/// Per-user cap on the dividend weight share: 15%
pub const DEFAULT_DIVIDEND_CAP_BPS: Bps = 1_500;

/// Dividend history window in settlement periods
pub const DEFAULT_DIVIDEND_HISTORY_PERIODS: u32 = 12;

/// Bounded attempts for wallet sink calls
pub const DEFAULT_WALLET_RETRY_ATTEMPTS: u32 = 3;

/// Tolerance when checking that the scorer weights sum to 1.0
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Validated snapshot of the economic parameters
///
/// # Invariants
/// - `distribution_ratio_bps` and `dividend_cap_bps` never exceed full scale
/// - scorer weights are finite, non-negative and sum to 1.0
/// - `dividend_decay` lies in (0.0, 1.0]
/// - `dividend_history_periods`, `wallet_retry_attempts` and `min_payout`
///   are at least 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicParams {
    /// Share of net income routed to the daily distribution pool
    pub distribution_ratio_bps: Bps,
    /// Scorer weight on game-coin earnings
    pub weight_coin: f64,
    /// Scorer weight on compute contribution
    pub weight_compute: f64,
    /// Scorer weight on transaction volume
    pub weight_tx: f64,
    /// Scaled-score dust threshold
    pub min_scaled_score: f64,
    /// Minimum per-recipient payout in atomic units
    pub min_payout: Amount,
    /// Exponential decay per period of age in dividend weights
    pub dividend_decay: f64,
    /// Per-user cap on the dividend weight share
    pub dividend_cap_bps: Bps,
    /// How many prior periods feed the dividend weights
    pub dividend_history_periods: u32,
    /// Bounded attempts for wallet sink calls
    pub wallet_retry_attempts: u32,
}

impl Default for EconomicParams {
    fn default() -> Self {
        Self {
            distribution_ratio_bps: DEFAULT_DISTRIBUTION_RATIO_BPS,
            weight_coin: DEFAULT_WEIGHT_COIN,
            weight_compute: DEFAULT_WEIGHT_COMPUTE,
            weight_tx: DEFAULT_WEIGHT_TX,
            min_scaled_score: DEFAULT_MIN_SCALED_SCORE,
            min_payout: DEFAULT_MIN_PAYOUT,
            dividend_decay: DEFAULT_DIVIDEND_DECAY,
            dividend_cap_bps: DEFAULT_DIVIDEND_CAP_BPS,
            dividend_history_periods: DEFAULT_DIVIDEND_HISTORY_PERIODS,
            wallet_retry_attempts: DEFAULT_WALLET_RETRY_ATTEMPTS,
        }
    }
}

impl EconomicParams {
    /// Check every invariant; returns the first violation found
    pub fn validate(&self) -> ParamResult<()> {
        if Amount::from(self.distribution_ratio_bps) > BPS_SCALE {
            return Err(ParamError::InvalidParams(format!(
                "distribution_ratio_bps {} exceeds full scale",
                self.distribution_ratio_bps
            )));
        }
        if Amount::from(self.dividend_cap_bps) > BPS_SCALE {
            return Err(ParamError::InvalidParams(format!(
                "dividend_cap_bps {} exceeds full scale",
                self.dividend_cap_bps
            )));
        }

        for (name, weight) in [
            ("weight_coin", self.weight_coin),
            ("weight_compute", self.weight_compute),
            ("weight_tx", self.weight_tx),
        ] {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ParamError::InvalidParams(format!(
                    "{} must lie in [0.0, 1.0], got {}",
                    name, weight
                )));
            }
        }
        let weight_sum = self.weight_coin + self.weight_compute + self.weight_tx;
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ParamError::InvalidParams(format!(
                "scorer weights must sum to 1.0, got {}",
                weight_sum
            )));
        }

        if !self.min_scaled_score.is_finite() || self.min_scaled_score < 0.0 {
            return Err(ParamError::InvalidParams(format!(
                "min_scaled_score must be finite and non-negative, got {}",
                self.min_scaled_score
            )));
        }
        if !self.dividend_decay.is_finite()
            || self.dividend_decay <= 0.0
            || self.dividend_decay > 1.0
        {
            return Err(ParamError::InvalidParams(format!(
                "dividend_decay must lie in (0.0, 1.0], got {}",
                self.dividend_decay
            )));
        }

        if self.min_payout == 0 {
            return Err(ParamError::InvalidParams(
                "min_payout must be at least one atomic unit".to_string(),
            ));
        }
        if self.dividend_history_periods == 0 {
            return Err(ParamError::InvalidParams(
                "dividend_history_periods must be at least 1".to_string(),
            ));
        }
        if self.wallet_retry_attempts == 0 {
            return Err(ParamError::InvalidParams(
                "wallet_retry_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
