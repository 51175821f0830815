//! Key encoding for the sled-backed grant store
//!
//! Grants are keyed by id. A secondary index keyed by user id, big-endian
//! grant day, and id lets one prefix scan list a user's grants oldest first.

use lib_types::{GrantId, PeriodId, UserId};

/// Length of a primary grant key in bytes
pub const GRANT_KEY_LEN: usize = 16;

/// Length of a composite user-index key in bytes
pub const USER_GRANT_KEY_LEN: usize = 52;

#[inline]
pub fn grant_key(id: GrantId) -> [u8; GRANT_KEY_LEN] {
    *id.as_bytes()
}

#[inline]
pub fn user_grant_key(
    user: UserId,
    granted_at: PeriodId,
    id: GrantId,
) -> [u8; USER_GRANT_KEY_LEN] {
    let mut key = [0u8; USER_GRANT_KEY_LEN];
    key[..32].copy_from_slice(user.as_bytes());
    key[32..36].copy_from_slice(&granted_at.to_key_bytes());
    key[36..].copy_from_slice(id.as_bytes());
    key
}

#[inline]
pub fn user_prefix(user: UserId) -> [u8; 32] {
    *user.as_bytes()
}

#[inline]
pub fn parse_user_grant_key(key: &[u8]) -> Option<(UserId, PeriodId, GrantId)> {
    if key.len() != USER_GRANT_KEY_LEN {
        return None;
    }
    let mut user = [0u8; 32];
    user.copy_from_slice(&key[..32]);
    let mut period = [0u8; 4];
    period.copy_from_slice(&key[32..36]);
    let mut id = [0u8; 16];
    id.copy_from_slice(&key[36..]);
    Some((
        UserId::new(user),
        PeriodId::from_key_bytes(period)?,
        GrantId::from_bytes(id),
    ))
}
