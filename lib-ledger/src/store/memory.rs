//! In-memory ledger log for tests and ephemeral deployments

use parking_lot::RwLock;
use std::sync::Arc;

use crate::errors::LedgerResult;
use crate::store::LedgerStore;
use crate::transaction::Transaction;

/// Vec-backed log. Clones share the same underlying entries.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedgerStore {
    log: Arc<RwLock<Vec<Transaction>>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn append(&self, tx: &Transaction) -> LedgerResult<()> {
        self.log.write().push(tx.clone());
        Ok(())
    }

    fn scan(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self.log.read().clone())
    }

    fn len(&self) -> LedgerResult<usize> {
        Ok(self.log.read().len())
    }
}
