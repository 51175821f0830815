//! In-memory snapshot store for tests and ephemeral deployments

use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use lib_types::{PeriodId, UserId};

use crate::errors::ScoringResult;
use crate::snapshot::ContributionSnapshot;
use crate::store::{in_window, SnapshotStore};

/// BTreeMap keyed by (user, period) so iteration matches the sled layout.
/// Clones share the same underlying map.
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotStore {
    snapshots: Arc<RwLock<BTreeMap<(UserId, PeriodId), ContributionSnapshot>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn put(&self, snapshot: &ContributionSnapshot) -> ScoringResult<bool> {
        let mut snapshots = self.snapshots.write();
        let key = (snapshot.user, snapshot.period);
        if snapshots.contains_key(&key) {
            return Ok(false);
        }
        snapshots.insert(key, *snapshot);
        Ok(true)
    }

    fn get(&self, user: UserId, period: PeriodId) -> ScoringResult<Option<ContributionSnapshot>> {
        Ok(self.snapshots.read().get(&(user, period)).copied())
    }

    fn history(
        &self,
        user: UserId,
        before: PeriodId,
        limit: usize,
    ) -> ScoringResult<Vec<ContributionSnapshot>> {
        let snapshots = self.snapshots.read();
        // Map iteration is ascending by (user, period); filtered to one user
        // that is ascending by period
        let mut history: Vec<ContributionSnapshot> = snapshots
            .iter()
            .filter(|((u, p), _)| *u == user && *p < before)
            .map(|(_, snapshot)| *snapshot)
            .collect();
        history.reverse();
        history.truncate(limit);
        Ok(history)
    }

    fn users_in_window(&self, before: PeriodId, periods: u32) -> ScoringResult<Vec<UserId>> {
        let snapshots = self.snapshots.read();
        let mut users = BTreeSet::new();
        for ((user, period), _) in snapshots.iter() {
            if in_window(*period, before, periods) {
                users.insert(*user);
            }
        }
        Ok(users.into_iter().collect())
    }
}
