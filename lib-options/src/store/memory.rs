//! In-memory grant store for tests and ephemeral deployments

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use lib_types::{GrantId, UserId};

use crate::errors::VestingResult;
use crate::grant::OptionGrant;
use crate::store::GrantStore;

/// BTreeMap keyed by grant id bytes. Clones share the same underlying map.
#[derive(Debug, Default, Clone)]
pub struct MemoryGrantStore {
    grants: Arc<RwLock<BTreeMap<[u8; 16], OptionGrant>>>,
}

impl MemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.grants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.read().is_empty()
    }
}

impl GrantStore for MemoryGrantStore {
    fn insert(&self, grant: &OptionGrant) -> VestingResult<bool> {
        let mut grants = self.grants.write();
        let key = *grant.id.as_bytes();
        if grants.contains_key(&key) {
            return Ok(false);
        }
        grants.insert(key, *grant);
        Ok(true)
    }

    fn get(&self, id: GrantId) -> VestingResult<Option<OptionGrant>> {
        Ok(self.grants.read().get(id.as_bytes()).copied())
    }

    fn list_for_user(&self, user: UserId) -> VestingResult<Vec<OptionGrant>> {
        let grants = self.grants.read();
        let mut list: Vec<OptionGrant> = grants
            .values()
            .filter(|g| g.user == user)
            .copied()
            .collect();
        list.sort_by_key(|g| (g.granted_at, *g.id.as_bytes()));
        Ok(list)
    }

    fn update(&self, expected: &OptionGrant, updated: &OptionGrant) -> VestingResult<bool> {
        debug_assert_eq!(expected.id, updated.id);
        let mut grants = self.grants.write();
        match grants.get(expected.id.as_bytes()) {
            Some(stored) if stored == expected => {
                grants.insert(*updated.id.as_bytes(), *updated);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_types::PeriodId;

    fn grant(user_tag: u8, year: i32, month: u32, day: u32) -> OptionGrant {
        OptionGrant::new(
            GrantId::random(),
            UserId::new([user_tag; 32]),
            365_000,
            365,
            PeriodId::from_ymd(year, month, day).unwrap(),
        )
    }

    #[test]
    fn test_insert_is_insert_if_absent() {
        let store = MemoryGrantStore::new();
        let g = grant(1, 2026, 1, 1);
        assert!(store.insert(&g).unwrap());
        assert!(!store.insert(&g).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_for_user_is_oldest_first() {
        let store = MemoryGrantStore::new();
        let newer = grant(1, 2026, 3, 1);
        let older = grant(1, 2026, 1, 1);
        let other = grant(2, 2025, 6, 1);
        store.insert(&newer).unwrap();
        store.insert(&older).unwrap();
        store.insert(&other).unwrap();

        let list = store.list_for_user(UserId::new([1u8; 32])).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, older.id);
        assert_eq!(list[1].id, newer.id);
    }

    #[test]
    fn test_update_compares_the_full_record() {
        let store = MemoryGrantStore::new();
        let g = grant(1, 2026, 1, 1);
        store.insert(&g).unwrap();

        let mut advanced = g;
        advanced.vested = 10_000;
        assert!(store.update(&g, &advanced).unwrap());

        // The original expectation is now stale
        let mut further = advanced;
        further.vested = 20_000;
        assert!(!store.update(&g, &further).unwrap());
        assert!(store.update(&advanced, &further).unwrap());

        let stored = store.get(g.id).unwrap().unwrap();
        assert_eq!(stored.vested, 20_000);
    }
}
