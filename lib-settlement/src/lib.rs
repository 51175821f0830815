//! Daily settlement engine for the Arcadia platform economy
//!
//! Each settlement period, a configured fraction of platform net income
//! becomes a distribution pool, split across users proportional to their
//! contribution score and paid out in A-Coin through the wallet sink.

pub mod allocation;
pub mod engine;
pub mod errors;
pub mod record;
pub mod store;

pub use allocation::{allocate_shares, distribution_pool, ShareAllocation};
pub use engine::SettlementEngine;
pub use errors::{SettlementError, SettlementResult};
pub use record::{
    CreditStatus, DistributionRecord, RecipientResult, SettlementOutcome, SettlementStatus,
};
pub use store::{MemorySettlementStore, SettlementStore, SledSettlementStore};
