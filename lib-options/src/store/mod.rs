//! Grant persistence backends

pub mod keys;
pub mod memory;
pub mod sled_store;

use lib_types::{GrantId, UserId};

use crate::errors::VestingResult;
use crate::grant::OptionGrant;

pub use memory::MemoryGrantStore;
pub use sled_store::SledGrantStore;

/// Durable store of option grants, keyed by grant id.
pub trait GrantStore: Send + Sync {
    /// Insert if absent. Returns false when the id is already present.
    fn insert(&self, grant: &OptionGrant) -> VestingResult<bool>;

    fn get(&self, id: GrantId) -> VestingResult<Option<OptionGrant>>;

    /// Every grant for `user`, oldest first
    fn list_for_user(&self, user: UserId) -> VestingResult<Vec<OptionGrant>>;

    /// Replace `expected` with `updated` only while the stored grant still
    /// equals `expected`. Returns false on a lost race.
    fn update(&self, expected: &OptionGrant, updated: &OptionGrant) -> VestingResult<bool>;
}
