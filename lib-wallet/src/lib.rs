//! Wallet sink seam between the economy engines and user balances.
//!
//! Engines compute *what* to pay; the wallet owns *where balances live*.
//! This crate defines the contract, a bounded retry wrapper for calling it,
//! and an in-memory reference implementation.

pub mod errors;
pub mod memory;
pub mod sink;

pub use errors::{WalletError, WalletResult};
pub use memory::MemoryWallet;
pub use sink::{RetryPolicy, WalletSink};
