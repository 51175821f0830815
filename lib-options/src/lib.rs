//! Option grants, linear vesting, and exercise for the Arcadia platform
//! economy
//!
//! O-Coin rewards platform-building work. A grant locks its tokens in the
//! pool, a linear schedule unlocks them day by day into the user's
//! spendable balance, and vested tokens can be exercised for cash whenever
//! the market price clears the strike.

pub mod engine;
pub mod errors;
pub mod grant;
pub mod store;
pub mod vesting;

pub use engine::VestingEngine;
pub use errors::{VestingError, VestingResult};
pub use grant::{GrantStatus, OptionGrant};
pub use store::{GrantStore, MemoryGrantStore, SledGrantStore};
pub use vesting::vested_target;
