//! Key encoding for the sled-backed snapshot store
//!
//! Snapshots are keyed by user id followed by big-endian period day number,
//! so one prefix scan yields a user's full history in period order.

use lib_types::{PeriodId, UserId};

/// Length of a composite snapshot key in bytes
pub const SNAPSHOT_KEY_LEN: usize = 36;

#[inline]
pub fn snapshot_key(user: UserId, period: PeriodId) -> [u8; SNAPSHOT_KEY_LEN] {
    let mut key = [0u8; SNAPSHOT_KEY_LEN];
    key[..32].copy_from_slice(user.as_bytes());
    key[32..].copy_from_slice(&period.to_key_bytes());
    key
}

#[inline]
pub fn user_prefix(user: UserId) -> [u8; 32] {
    *user.as_bytes()
}

#[inline]
pub fn parse_snapshot_key(key: &[u8]) -> Option<(UserId, PeriodId)> {
    if key.len() != SNAPSHOT_KEY_LEN {
        return None;
    }
    let mut user = [0u8; 32];
    user.copy_from_slice(&key[..32]);
    let mut period = [0u8; 4];
    period.copy_from_slice(&key[32..]);
    Some((UserId::new(user), PeriodId::from_key_bytes(period)?))
}
