//! Option grant records

use lib_types::{Amount, GrantId, PeriodId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a grant, derived from its amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantStatus {
    Granted,
    PartiallyVested,
    FullyVested,
}

impl GrantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantStatus::Granted => "granted",
            GrantStatus::PartiallyVested => "partially_vested",
            GrantStatus::FullyVested => "fully_vested",
        }
    }
}

impl fmt::Display for GrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One performance-based option grant.
///
/// `vested` only ever grows and never passes `granted`; `exercised` only
/// ever grows and never passes `vested`. The vesting engine is the sole
/// writer after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGrant {
    pub id: GrantId,
    pub user: UserId,
    /// Total option tokens in the grant
    pub granted: Amount,
    /// Unlocked so far
    pub vested: Amount,
    /// Converted to cash so far
    pub exercised: Amount,
    /// Days until the grant is fully vested
    pub vesting_days: u32,
    /// Day the vesting clock started
    pub granted_at: PeriodId,
    pub fully_vested: bool,
}

impl OptionGrant {
    pub fn new(
        id: GrantId,
        user: UserId,
        granted: Amount,
        vesting_days: u32,
        granted_at: PeriodId,
    ) -> Self {
        Self {
            id,
            user,
            granted,
            vested: 0,
            exercised: 0,
            vesting_days,
            granted_at,
            fully_vested: false,
        }
    }

    /// Vested tokens not yet converted to cash
    pub fn vested_unexercised(&self) -> Amount {
        self.vested.saturating_sub(self.exercised)
    }

    pub fn status(&self) -> GrantStatus {
        if self.fully_vested {
            GrantStatus::FullyVested
        } else if self.vested > 0 {
            GrantStatus::PartiallyVested
        } else {
            GrantStatus::Granted
        }
    }
}
