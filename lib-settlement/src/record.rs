//! Settlement outcome records
//!
//! One `DistributionRecord` per settled period, immutable once written.
//! Insufficient income is a recorded terminal state, not an error: callers
//! can always tell "nothing to distribute" apart from a fault.

use lib_types::{Amount, PeriodId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state of one settlement period.
///
/// Discriminants are persisted inside serialized records.
/// FIXED - DO NOT CHANGE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SettlementStatus {
    /// The period was scored and credits were attempted
    Completed = 1,
    /// Net income was not positive; nothing to distribute
    InsufficientIncome = 2,
    /// Eligible recipients existed but every credit failed
    Failed = 3,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Completed => "completed",
            SettlementStatus::InsufficientIncome => "insufficient_income",
            SettlementStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether one recipient's wallet credit landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CreditStatus {
    Credited = 1,
    Failed = 2,
}

/// One recipient's line in a distribution record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientResult {
    pub user: UserId,
    /// Contribution score the share was derived from
    pub score: f64,
    /// Share of the pool in parts per million
    pub share_ppm: u64,
    pub amount: Amount,
    pub status: CreditStatus,
    /// Failure detail when status is Failed
    pub reason: Option<String>,
}

/// Immutable per-period settlement record, at most one per period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub period: PeriodId,
    /// Net income the pool was derived from, in atomic units; may be <= 0
    pub income_base: i128,
    pub pool: Amount,
    pub recipients: Vec<RecipientResult>,
    pub status: SettlementStatus,
    /// Why the period did not complete normally
    pub reason: Option<String>,
    /// Unix seconds
    pub settled_at: u64,
}

impl DistributionRecord {
    /// Sum of amounts that actually reached a wallet
    pub fn distributed(&self) -> Amount {
        self.recipients
            .iter()
            .filter(|r| r.status == CreditStatus::Credited)
            .map(|r| r.amount)
            .sum()
    }

    pub fn credited_count(&self) -> u32 {
        self.recipients
            .iter()
            .filter(|r| r.status == CreditStatus::Credited)
            .count() as u32
    }

    pub fn failed_count(&self) -> u32 {
        self.recipients
            .iter()
            .filter(|r| r.status == CreditStatus::Failed)
            .count() as u32
    }
}

/// Structured caller-facing result of one settle call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub success: bool,
    pub status: SettlementStatus,
    /// Total amount credited to wallets
    pub distributed: Amount,
    /// Recipients credited
    pub recipients: u32,
    /// Recipients whose credit failed
    pub failures: u32,
    pub message: String,
    pub record: DistributionRecord,
}

impl SettlementOutcome {
    pub fn from_record(record: DistributionRecord, message: impl Into<String>) -> Self {
        Self {
            success: record.status == SettlementStatus::Completed,
            status: record.status,
            distributed: record.distributed(),
            recipients: record.credited_count(),
            failures: record.failed_count(),
            message: message.into(),
            record,
        }
    }
}
