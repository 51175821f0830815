//! Ledger persistence backends
//!
//! The log itself is storage-agnostic: `memory` for tests and ephemeral
//! setups, `sled_store` for durable deployments.

pub mod keys;
pub mod memory;
pub mod sled_store;

use crate::errors::LedgerResult;
use crate::transaction::Transaction;

pub use memory::MemoryLedgerStore;
pub use sled_store::SledLedgerStore;

/// Append-only transaction log.
///
/// Implementations must preserve append order across `scan` calls and must
/// never mutate or drop an entry once `append` returns Ok.
pub trait LedgerStore: Send + Sync {
    /// Durably append one entry at the end of the log
    fn append(&self, tx: &Transaction) -> LedgerResult<()>;

    /// Full log in append order
    fn scan(&self) -> LedgerResult<Vec<Transaction>>;

    /// Number of entries in the log
    fn len(&self) -> LedgerResult<usize>;

    fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.len()? == 0)
    }
}
