//! Dividend weight and payout records

use lib_types::{Amount, PeriodId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One user's capped ownership weight for one dividend period.
///
/// At most one live record per (user, period); recalculation replaces the
/// prior record, matched by the most recent `calculated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendWeightRecord {
    pub user: UserId,
    pub period: PeriodId,
    /// Decayed multi-period performance score
    pub historical_score: f64,
    /// Capped share of the dividend pool, parts per million
    pub weight_ppm: u64,
    /// Unix seconds
    pub calculated_at: u64,
}

/// Whether one user's dividend credit landed.
///
/// Discriminants are persisted inside serialized records.
/// FIXED - DO NOT CHANGE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum DividendStatus {
    Paid = 1,
    Failed = 2,
}

impl DividendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DividendStatus::Paid => "paid",
            DividendStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for DividendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user's line in a cash dividend distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashDividendRecord {
    pub user: UserId,
    pub period: PeriodId,
    pub weight_ppm: u64,
    pub amount: Amount,
    pub status: DividendStatus,
    /// Failure detail when status is Failed
    pub reason: Option<String>,
}

/// Structured caller-facing result of one distribution call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendOutcome {
    pub success: bool,
    pub period: PeriodId,
    pub pool: Amount,
    /// Total amount credited to wallets
    pub distributed: Amount,
    pub recipients: u32,
    pub failures: u32,
    pub message: String,
    pub records: Vec<CashDividendRecord>,
}

impl DividendOutcome {
    pub fn from_records(
        period: PeriodId,
        pool: Amount,
        records: Vec<CashDividendRecord>,
        message: impl Into<String>,
    ) -> Self {
        let distributed = records
            .iter()
            .filter(|r| r.status == DividendStatus::Paid)
            .map(|r| r.amount)
            .sum();
        let recipients = records
            .iter()
            .filter(|r| r.status == DividendStatus::Paid)
            .count() as u32;
        let failures = records.len() as u32 - recipients;
        Self {
            success: records.is_empty() || recipients > 0,
            period,
            pool,
            distributed,
            recipients,
            failures,
            message: message.into(),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: u8, amount: Amount, status: DividendStatus) -> CashDividendRecord {
        CashDividendRecord {
            user: UserId::new([tag; 32]),
            period: PeriodId::from_ymd(2026, 3, 1).unwrap(),
            weight_ppm: 500_000,
            amount,
            status,
            reason: None,
        }
    }

    #[test]
    fn test_outcome_counts_paid_and_failed() {
        let outcome = DividendOutcome::from_records(
            PeriodId::from_ymd(2026, 3, 1).unwrap(),
            150_000,
            vec![
                record(1, 75_000, DividendStatus::Paid),
                record(2, 45_000, DividendStatus::Failed),
            ],
            "partial",
        );
        assert!(outcome.success);
        assert_eq!(outcome.distributed, 75_000);
        assert_eq!(outcome.recipients, 1);
        assert_eq!(outcome.failures, 1);
    }

    #[test]
    fn test_outcome_with_every_credit_failed_is_not_success() {
        let outcome = DividendOutcome::from_records(
            PeriodId::from_ymd(2026, 3, 1).unwrap(),
            150_000,
            vec![record(1, 75_000, DividendStatus::Failed)],
            "all failed",
        );
        assert!(!outcome.success);
        assert_eq!(outcome.distributed, 0);
    }

    #[test]
    fn test_empty_distribution_is_success() {
        let outcome = DividendOutcome::from_records(
            PeriodId::from_ymd(2026, 3, 1).unwrap(),
            150_000,
            Vec::new(),
            "no eligible recipients",
        );
        assert!(outcome.success);
        assert_eq!(outcome.recipients, 0);
    }
}
