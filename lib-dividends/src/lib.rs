//! Historical dividend weights and cash distribution for the Arcadia
//! platform economy
//!
//! Dividend weights reward sustained contribution: each user's snapshot
//! history is folded with exponential time decay into a score, scores are
//! normalized into capped pool weights, and a cash pool is split across
//! those weights and paid out through the wallet sink.

pub mod engine;
pub mod errors;
pub mod record;
pub mod store;
pub mod weights;

pub use engine::DividendEngine;
pub use errors::{DividendError, DividendResult};
pub use record::{CashDividendRecord, DividendOutcome, DividendStatus, DividendWeightRecord};
pub use store::{MemoryWeightStore, SledWeightStore, WeightStore};
pub use weights::{historical_score, normalize_weights};
