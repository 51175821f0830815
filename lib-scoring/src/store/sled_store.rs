//! Sled-backed snapshot store
//!
//! Keys are user id followed by big-endian period day number (see `keys`),
//! so per-user history is one prefix scan and insert-if-absent is a single
//! compare-and-swap against an empty slot.

use sled::{Db, Tree};
use std::collections::BTreeSet;
use std::path::Path;

use lib_types::{PeriodId, UserId};

use crate::errors::{ScoringError, ScoringResult};
use crate::snapshot::ContributionSnapshot;
use crate::store::{in_window, keys, SnapshotStore};

// Tree name. FIXED - DO NOT CHANGE: renaming orphans existing data.
const TREE_SNAPSHOTS: &str = "contribution_snapshots";

pub struct SledSnapshotStore {
    #[allow(dead_code)]
    db: Db,
    snapshots: Tree,
}

impl SledSnapshotStore {
    /// Open (or create) a durable store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> ScoringResult<Self> {
        let db = sled::open(path).map_err(|e| ScoringError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    /// Open a throwaway store backed by a temporary sled database
    pub fn open_temporary() -> ScoringResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| ScoringError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    fn with_db(db: Db) -> ScoringResult<Self> {
        let snapshots = db
            .open_tree(TREE_SNAPSHOTS)
            .map_err(|e| ScoringError::Storage(e.to_string()))?;
        Ok(Self { db, snapshots })
    }

    /// Block until all writes are on disk
    pub fn flush(&self) -> ScoringResult<()> {
        self.snapshots
            .flush()
            .map_err(|e| ScoringError::Storage(e.to_string()))?;
        Ok(())
    }

    fn serialize(snapshot: &ContributionSnapshot) -> ScoringResult<Vec<u8>> {
        bincode::serialize(snapshot).map_err(|e| ScoringError::Serialization(e.to_string()))
    }

    fn deserialize(bytes: &[u8]) -> ScoringResult<ContributionSnapshot> {
        bincode::deserialize(bytes).map_err(|e| ScoringError::Serialization(e.to_string()))
    }
}

impl SnapshotStore for SledSnapshotStore {
    fn put(&self, snapshot: &ContributionSnapshot) -> ScoringResult<bool> {
        let key = keys::snapshot_key(snapshot.user, snapshot.period);
        let bytes = Self::serialize(snapshot)?;
        let outcome = self
            .snapshots
            .compare_and_swap(key, None as Option<&[u8]>, Some(bytes))
            .map_err(|e| ScoringError::Storage(e.to_string()))?;
        Ok(outcome.is_ok())
    }

    fn get(&self, user: UserId, period: PeriodId) -> ScoringResult<Option<ContributionSnapshot>> {
        match self
            .snapshots
            .get(keys::snapshot_key(user, period))
            .map_err(|e| ScoringError::Storage(e.to_string()))?
        {
            Some(bytes) => Ok(Some(Self::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn history(
        &self,
        user: UserId,
        before: PeriodId,
        limit: usize,
    ) -> ScoringResult<Vec<ContributionSnapshot>> {
        let mut history = Vec::new();
        for item in self.snapshots.scan_prefix(keys::user_prefix(user)) {
            let (key, value) = item.map_err(|e| ScoringError::Storage(e.to_string()))?;
            let (_, period) = keys::parse_snapshot_key(&key).ok_or_else(|| {
                ScoringError::CorruptedData(format!("malformed snapshot key: {} bytes", key.len()))
            })?;
            // Keys ascend by period inside one user prefix
            if period >= before {
                break;
            }
            history.push(Self::deserialize(&value)?);
        }
        history.reverse();
        history.truncate(limit);
        Ok(history)
    }

    fn users_in_window(&self, before: PeriodId, periods: u32) -> ScoringResult<Vec<UserId>> {
        let mut users = BTreeSet::new();
        for item in self.snapshots.iter() {
            let (key, _) = item.map_err(|e| ScoringError::Storage(e.to_string()))?;
            let (user, period) = keys::parse_snapshot_key(&key).ok_or_else(|| {
                ScoringError::CorruptedData(format!("malformed snapshot key: {} bytes", key.len()))
            })?;
            if in_window(period, before, periods) {
                users.insert(user);
            }
        }
        Ok(users.into_iter().collect())
    }
}
