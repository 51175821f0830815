//! Governable Parameter Fields
//!
//! Defines which economic parameters can be modified through governance.

use serde::{Deserialize, Serialize};

/// Economic parameters that can be modified through governance
///
/// Each field has specific rules about:
/// - Whether it is governable at all
/// - The value kind it accepts
/// - Validation constraints (enforced when a snapshot is built)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamField {
    // =========================================================================
    // Settlement Configuration
    // =========================================================================
    /// Share of net income routed to the daily distribution pool (0-10000)
    DistributionRatioBps,
    /// Minimum per-recipient payout in atomic units
    MinPayout,

    // =========================================================================
    // Scoring Configuration
    // =========================================================================
    /// Scorer weight on game-coin earnings (fraction of 1.0)
    WeightCoin,
    /// Scorer weight on compute contribution (fraction of 1.0)
    WeightCompute,
    /// Scorer weight on transaction volume (fraction of 1.0)
    WeightTx,
    /// Scaled-score threshold below which a contribution score is zeroed
    MinScaledScore,

    // =========================================================================
    // Dividend Configuration
    // =========================================================================
    /// Exponential decay applied per period of age in dividend weights
    DividendDecay,
    /// Per-user cap on the dividend weight share (0-10000)
    DividendCapBps,
    /// How many prior periods of snapshots feed the dividend weights
    DividendHistoryPeriods,

    // =========================================================================
    // Operational (not governable)
    // =========================================================================
    /// Bounded attempts for wallet sink calls
    WalletRetryAttempts,

    // =========================================================================
    // Immutable (for completeness - always rejected)
    // =========================================================================
    /// Atomic units per display unit (immutable)
    AmountScale,
    /// Settlement period length: one calendar day (immutable)
    PeriodLength,
}

impl ParamField {
    /// Check if this field can be modified through governance
    pub fn is_governable(&self) -> bool {
        match self {
            // Governable settlement fields
            ParamField::DistributionRatioBps => true,
            ParamField::MinPayout => true,

            // Governable scoring fields
            ParamField::WeightCoin => true,
            ParamField::WeightCompute => true,
            ParamField::WeightTx => true,
            ParamField::MinScaledScore => true,

            // Governable dividend fields
            ParamField::DividendDecay => true,
            ParamField::DividendCapBps => true,
            ParamField::DividendHistoryPeriods => true,

            // Operational knobs stay with the operator
            ParamField::WalletRetryAttempts => false,

            // Immutable fields - NOT governable
            ParamField::AmountScale => false,
            ParamField::PeriodLength => false,
        }
    }

    /// Get the category of this field
    pub fn category(&self) -> FieldCategory {
        match self {
            ParamField::DistributionRatioBps | ParamField::MinPayout => {
                FieldCategory::Settlement
            }

            ParamField::WeightCoin
            | ParamField::WeightCompute
            | ParamField::WeightTx
            | ParamField::MinScaledScore => FieldCategory::Scoring,

            ParamField::DividendDecay
            | ParamField::DividendCapBps
            | ParamField::DividendHistoryPeriods => FieldCategory::Dividends,

            ParamField::WalletRetryAttempts => FieldCategory::Operational,

            ParamField::AmountScale | ParamField::PeriodLength => FieldCategory::Immutable,
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ParamField::DistributionRatioBps => "Distribution pool ratio (basis points)",
            ParamField::MinPayout => "Minimum payout (atomic units)",
            ParamField::WeightCoin => "Scorer weight: game-coin earnings",
            ParamField::WeightCompute => "Scorer weight: compute contribution",
            ParamField::WeightTx => "Scorer weight: transaction volume",
            ParamField::MinScaledScore => "Minimum scaled contribution score",
            ParamField::DividendDecay => "Dividend time-decay factor",
            ParamField::DividendCapBps => "Dividend weight cap (basis points)",
            ParamField::DividendHistoryPeriods => "Dividend history window (periods)",
            ParamField::WalletRetryAttempts => "Wallet sink retry attempts",
            ParamField::AmountScale => "Amount scale (immutable)",
            ParamField::PeriodLength => "Settlement period length (immutable)",
        }
    }
}

/// Category of parameter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    /// Daily settlement configuration
    Settlement,
    /// Contribution scorer configuration
    Scoring,
    /// Dividend weight configuration
    Dividends,
    /// Operator-owned runtime knobs
    Operational,
    /// Immutable fields (cannot be changed)
    Immutable,
}
