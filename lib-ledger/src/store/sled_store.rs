//! Sled-backed ledger log
//!
//! One tree holds the entries keyed by big-endian sequence number, so a
//! plain tree iteration replays the log in append order. The next sequence
//! number is recovered from the last key on open, which makes the log safe
//! to reopen after a crash.

use sled::{Db, Tree};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::{LedgerError, LedgerResult};
use crate::store::{keys, LedgerStore};
use crate::transaction::Transaction;

// Tree name. FIXED - DO NOT CHANGE: renaming orphans existing data.
const TREE_TRANSACTIONS: &str = "ledger_transactions";

pub struct SledLedgerStore {
    #[allow(dead_code)]
    db: Db,
    transactions: Tree,
    next_seq: AtomicU64,
}

impl SledLedgerStore {
    /// Open (or create) a durable log at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let db = sled::open(path).map_err(|e| LedgerError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    /// Open a throwaway log backed by a temporary sled database
    pub fn open_temporary() -> LedgerResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    fn with_db(db: Db) -> LedgerResult<Self> {
        let transactions = db
            .open_tree(TREE_TRANSACTIONS)
            .map_err(|e| LedgerError::Storage(e.to_string()))?;

        // Resume the sequence from the highest existing key
        let next_seq = match transactions
            .last()
            .map_err(|e| LedgerError::Storage(e.to_string()))?
        {
            Some((key, _)) => {
                let last = keys::parse_tx_seq(&key).ok_or_else(|| {
                    LedgerError::CorruptedData(format!("malformed sequence key: {} bytes", key.len()))
                })?;
                last + 1
            }
            None => 0,
        };

        Ok(Self {
            db,
            transactions,
            next_seq: AtomicU64::new(next_seq),
        })
    }

    /// Block until all appends are on disk
    pub fn flush(&self) -> LedgerResult<()> {
        self.transactions
            .flush()
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(())
    }

    fn serialize(tx: &Transaction) -> LedgerResult<Vec<u8>> {
        bincode::serialize(tx).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    fn deserialize(bytes: &[u8]) -> LedgerResult<Transaction> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
    }
}

impl LedgerStore for SledLedgerStore {
    fn append(&self, tx: &Transaction) -> LedgerResult<()> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let bytes = Self::serialize(tx)?;
        self.transactions
            .insert(keys::tx_seq_key(seq), bytes)
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(())
    }

    fn scan(&self) -> LedgerResult<Vec<Transaction>> {
        let mut log = Vec::with_capacity(self.transactions.len());
        for item in self.transactions.iter() {
            let (_, value) = item.map_err(|e| LedgerError::Storage(e.to_string()))?;
            log.push(Self::deserialize(&value)?);
        }
        Ok(log)
    }

    fn len(&self) -> LedgerResult<usize> {
        Ok(self.transactions.len())
    }
}
