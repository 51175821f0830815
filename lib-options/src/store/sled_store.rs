//! Sled-backed grant store
//!
//! Grants live in a primary tree keyed by id; a secondary index tree keyed
//! by user, grant day, and id makes listing a user's grants one prefix scan
//! in oldest-first order. Index entries are immutable because only `vested`,
//! `exercised`, and the fully-vested flag ever change.

use sled::{Db, Tree};
use std::path::Path;

use lib_types::{GrantId, UserId};

use crate::errors::{VestingError, VestingResult};
use crate::grant::OptionGrant;
use crate::store::{keys, GrantStore};

// Tree names. FIXED - DO NOT CHANGE: renaming orphans existing data.
const TREE_GRANTS: &str = "option_grants";
const TREE_USER_GRANTS: &str = "option_grants_by_user";

pub struct SledGrantStore {
    #[allow(dead_code)]
    db: Db,
    grants: Tree,
    by_user: Tree,
}

impl SledGrantStore {
    /// Open (or create) a durable store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> VestingResult<Self> {
        let db = sled::open(path).map_err(|e| VestingError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    /// Open a throwaway store backed by a temporary sled database
    pub fn open_temporary() -> VestingResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| VestingError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    fn with_db(db: Db) -> VestingResult<Self> {
        let grants = db
            .open_tree(TREE_GRANTS)
            .map_err(|e| VestingError::Storage(e.to_string()))?;
        let by_user = db
            .open_tree(TREE_USER_GRANTS)
            .map_err(|e| VestingError::Storage(e.to_string()))?;
        Ok(Self { db, grants, by_user })
    }

    /// Block until all writes are on disk
    pub fn flush(&self) -> VestingResult<()> {
        self.grants
            .flush()
            .map_err(|e| VestingError::Storage(e.to_string()))?;
        self.by_user
            .flush()
            .map_err(|e| VestingError::Storage(e.to_string()))?;
        Ok(())
    }

    fn serialize(grant: &OptionGrant) -> VestingResult<Vec<u8>> {
        bincode::serialize(grant).map_err(|e| VestingError::Serialization(e.to_string()))
    }

    fn deserialize(bytes: &[u8]) -> VestingResult<OptionGrant> {
        bincode::deserialize(bytes).map_err(|e| VestingError::Serialization(e.to_string()))
    }
}

impl GrantStore for SledGrantStore {
    fn insert(&self, grant: &OptionGrant) -> VestingResult<bool> {
        let bytes = Self::serialize(grant)?;
        let outcome = self
            .grants
            .compare_and_swap(keys::grant_key(grant.id), None as Option<&[u8]>, Some(bytes))
            .map_err(|e| VestingError::Storage(e.to_string()))?;
        if outcome.is_err() {
            return Ok(false);
        }
        self.by_user
            .insert(
                keys::user_grant_key(grant.user, grant.granted_at, grant.id),
                &keys::grant_key(grant.id),
            )
            .map_err(|e| VestingError::Storage(e.to_string()))?;
        Ok(true)
    }

    fn get(&self, id: GrantId) -> VestingResult<Option<OptionGrant>> {
        match self
            .grants
            .get(keys::grant_key(id))
            .map_err(|e| VestingError::Storage(e.to_string()))?
        {
            Some(bytes) => Ok(Some(Self::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn list_for_user(&self, user: UserId) -> VestingResult<Vec<OptionGrant>> {
        let mut list = Vec::new();
        // Index keys ascend by grant day inside one user prefix
        for item in self.by_user.scan_prefix(keys::user_prefix(user)) {
            let (_, id_bytes) = item.map_err(|e| VestingError::Storage(e.to_string()))?;
            match self
                .grants
                .get(&id_bytes)
                .map_err(|e| VestingError::Storage(e.to_string()))?
            {
                Some(bytes) => list.push(Self::deserialize(&bytes)?),
                None => {
                    return Err(VestingError::Storage(
                        "grant index points at a missing record".to_string(),
                    ))
                }
            }
        }
        Ok(list)
    }

    fn update(&self, expected: &OptionGrant, updated: &OptionGrant) -> VestingResult<bool> {
        debug_assert_eq!(expected.id, updated.id);
        let expected_bytes = Self::serialize(expected)?;
        let updated_bytes = Self::serialize(updated)?;
        let outcome = self
            .grants
            .compare_and_swap(
                keys::grant_key(updated.id),
                Some(expected_bytes),
                Some(updated_bytes),
            )
            .map_err(|e| VestingError::Storage(e.to_string()))?;
        Ok(outcome.is_ok())
    }
}
