//! Parameter Source
//!
//! Engines never own their tuning values. They hold a `ParameterSource` and
//! take a full snapshot at the start of each operation, so a governance
//! update lands between batches, never inside one.

use lib_types::Amount;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::{ParamError, ParamResult};
use crate::fields::ParamField;
use crate::params::EconomicParams;

/// Read side of the governance parameter store
pub trait ParameterSource: Send + Sync {
    /// Current validated parameter snapshot
    fn snapshot(&self) -> ParamResult<EconomicParams>;
}

/// A typed parameter value carried by a governance update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// Basis-point ratio (0-10000)
    Bps(u16),
    /// Fraction of 1.0
    Fraction(f64),
    /// Atomic units
    Units(Amount),
    /// Plain count
    Count(u32),
}

/// In-memory parameter source
///
/// Holds one validated snapshot behind a read/write lock. Writers replace
/// the whole snapshot or apply a single governable field; either way the
/// result is re-validated before it becomes visible.
pub struct MemoryParams {
    current: RwLock<EconomicParams>,
}

impl MemoryParams {
    /// Start from validated parameters
    pub fn new(params: EconomicParams) -> ParamResult<Self> {
        params.validate()?;
        Ok(Self {
            current: RwLock::new(params),
        })
    }

    /// Start from the default parameter set
    pub fn with_defaults() -> Self {
        Self {
            current: RwLock::new(EconomicParams::default()),
        }
    }

    /// Replace the whole snapshot (validated first)
    pub fn replace(&self, params: EconomicParams) -> ParamResult<()> {
        params.validate()?;
        *self.current.write() = params;
        Ok(())
    }

    /// Apply a single governable field update
    ///
    /// Rejects non-governable fields, kind mismatches, and any update whose
    /// resulting snapshot fails validation; the stored snapshot is untouched
    /// on every error path.
    pub fn apply(&self, field: ParamField, value: ParamValue) -> ParamResult<()> {
        if !field.is_governable() {
            return Err(ParamError::FieldNotGovernable(field));
        }

        let mut next = *self.current.read();
        match (field, value) {
            (ParamField::DistributionRatioBps, ParamValue::Bps(v)) => {
                next.distribution_ratio_bps = v;
            }
            (ParamField::MinPayout, ParamValue::Units(v)) => next.min_payout = v,
            (ParamField::WeightCoin, ParamValue::Fraction(v)) => next.weight_coin = v,
            (ParamField::WeightCompute, ParamValue::Fraction(v)) => next.weight_compute = v,
            (ParamField::WeightTx, ParamValue::Fraction(v)) => next.weight_tx = v,
            (ParamField::MinScaledScore, ParamValue::Fraction(v)) => next.min_scaled_score = v,
            (ParamField::DividendDecay, ParamValue::Fraction(v)) => next.dividend_decay = v,
            (ParamField::DividendCapBps, ParamValue::Bps(v)) => next.dividend_cap_bps = v,
            (ParamField::DividendHistoryPeriods, ParamValue::Count(v)) => {
                next.dividend_history_periods = v;
            }
            (field, value) => {
                return Err(ParamError::InvalidValue {
                    field,
                    reason: format!("value kind {:?} does not match field", value),
                });
            }
        }
        next.validate()?;

        *self.current.write() = next;
        Ok(())
    }
}

impl ParameterSource for MemoryParams {
    fn snapshot(&self) -> ParamResult<EconomicParams> {
        Ok(*self.current.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_returns_stored_params() {
        let source = MemoryParams::with_defaults();
        let params = source.snapshot().unwrap();
        assert_eq!(params, EconomicParams::default());
    }

    #[test]
    fn new_rejects_invalid_params() {
        let bad = EconomicParams {
            distribution_ratio_bps: 20_000,
            ..EconomicParams::default()
        };
        assert!(MemoryParams::new(bad).is_err());
    }

    #[test]
    fn apply_updates_governable_field() {
        let source = MemoryParams::with_defaults();
        source
            .apply(ParamField::DistributionRatioBps, ParamValue::Bps(5_000))
            .unwrap();
        assert_eq!(source.snapshot().unwrap().distribution_ratio_bps, 5_000);
    }

    #[test]
    fn apply_rejects_non_governable_field() {
        let source = MemoryParams::with_defaults();
        let result = source.apply(ParamField::WalletRetryAttempts, ParamValue::Count(5));
        assert!(matches!(result, Err(ParamError::FieldNotGovernable(_))));
    }

    #[test]
    fn apply_rejects_kind_mismatch() {
        let source = MemoryParams::with_defaults();
        let result = source.apply(ParamField::DividendDecay, ParamValue::Bps(100));
        assert!(matches!(result, Err(ParamError::InvalidValue { .. })));
    }

    #[test]
    fn apply_rolls_back_on_invalid_result() {
        let source = MemoryParams::with_defaults();
        // Pushing one weight alone breaks the sum-to-one invariant
        let result = source.apply(ParamField::WeightCoin, ParamValue::Fraction(0.9));
        assert!(result.is_err());
        assert_eq!(
            source.snapshot().unwrap().weight_coin,
            EconomicParams::default().weight_coin
        );
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let source = MemoryParams::with_defaults();
        let next = EconomicParams {
            weight_coin: 1.0,
            weight_compute: 0.0,
            weight_tx: 0.0,
            ..EconomicParams::default()
        };
        source.replace(next).unwrap();
        assert_eq!(source.snapshot().unwrap().weight_coin, 1.0);
    }
}
