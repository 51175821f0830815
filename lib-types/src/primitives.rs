//! Canonical primitive types for the platform economy
//!
//! Rule: no string identifiers in persisted state. Ever.
//!
//! These types are the foundational building blocks for every record the
//! ledger, settlement, dividend and vesting engines persist. They are
//! designed to be:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable
//! - Efficient to copy and compare

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// TYPE ALIASES AND SCALES
// ============================================================================

/// Token and cash amounts in atomic units (supports up to ~340 undecillion units)
pub type Amount = u128;

/// Atomic units per display unit: every amount carries two decimal places,
/// so the smallest representable payout is 0.01
pub const AMOUNT_SCALE: Amount = 100;

/// Basis points for percentage calculations (10000 = 100%)
pub type Bps = u16;

/// Full basis-point scale as an `Amount` for integer ratio math
pub const BPS_SCALE: Amount = 10_000;

/// Full parts-per-million scale for share arithmetic
pub const PPM_SCALE: u64 = 1_000_000;

/// Convert a fractional value in `[0.0, 1.0]` to parts per million.
///
/// NaN and negative inputs map to zero; values above 1.0 saturate at the
/// full scale. All money math downstream runs on the integer result.
pub fn to_ppm(fraction: f64) -> u64 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    if fraction >= 1.0 {
        return PPM_SCALE;
    }
    (fraction * PPM_SCALE as f64).round() as u64
}

/// Render an amount with its two decimal places (for logs and messages)
pub fn format_amount(amount: Amount) -> String {
    format!("{}.{:02}", amount / AMOUNT_SCALE, amount % AMOUNT_SCALE)
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 32-byte user identifier (derived from the account's public key)
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct UserId(pub [u8; 32]);

impl UserId {
    /// Create a new UserId from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed UserId
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero id
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for UserId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for UserId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// RECORD IDENTIFIERS
// ============================================================================

/// Unique ledger transaction identifier
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TxId(Uuid);

impl TxId {
    /// Generate a fresh random identifier
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derive a stable identifier from a domain tag and key material.
    ///
    /// Two calls with the same inputs yield the same id, so derived ids
    /// double as idempotency keys for bookkeeping entries.
    pub fn derived(domain: &str, material: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(material);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hasher.finalize().as_bytes()[..16]);
        Self(Uuid::from_bytes(bytes))
    }

    /// Get the underlying uuid
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", hex::encode(&self.as_bytes()[..8]))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TxId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Unique option grant identifier
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GrantId(Uuid);

impl GrantId {
    /// Generate a fresh random identifier
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Rebuild an identifier from its raw bytes (key decoding)
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Get the underlying uuid
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrantId({})", hex::encode(&self.as_bytes()[..8]))
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for GrantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

// ============================================================================
// SETTLEMENT PERIODS
// ============================================================================

/// Settlement period: one calendar day (UTC)
///
/// Periods order chronologically and encode to a fixed-width big-endian key
/// so period-prefixed store scans come back in calendar order.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PeriodId(NaiveDate);

impl PeriodId {
    /// Wrap a calendar date
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year/month/day; `None` for invalid dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Get the underlying date
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole days from `earlier` to `self` (negative when `earlier` is later)
    pub fn days_since(&self, earlier: PeriodId) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }

    /// Fixed-width big-endian key encoding (sorts chronologically)
    pub fn to_key_bytes(&self) -> [u8; 4] {
        (self.0.num_days_from_ce() as u32).to_be_bytes()
    }

    /// Decode a key produced by [`to_key_bytes`](Self::to_key_bytes)
    pub fn from_key_bytes(bytes: [u8; 4]) -> Option<Self> {
        NaiveDate::from_num_days_from_ce_opt(u32::from_be_bytes(bytes) as i32).map(Self)
    }
}

impl fmt::Debug for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeriodId({})", self.0)
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NaiveDate> for PeriodId {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

// ============================================================================
// TESTS
// ============================================================================
