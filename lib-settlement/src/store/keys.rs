//! Key encoding for the sled-backed settlement store
//!
//! Distribution records are keyed by period day number; payout marks by
//! period day number followed by user id, so one prefix scan yields every
//! applied payout of a period.

use lib_types::{PeriodId, UserId};

pub const RECORD_KEY_LEN: usize = 4;
pub const PAYOUT_KEY_LEN: usize = 36;

#[inline]
pub fn record_key(period: PeriodId) -> [u8; RECORD_KEY_LEN] {
    period.to_key_bytes()
}

#[inline]
pub fn payout_key(period: PeriodId, user: UserId) -> [u8; PAYOUT_KEY_LEN] {
    let mut key = [0u8; PAYOUT_KEY_LEN];
    key[..4].copy_from_slice(&period.to_key_bytes());
    key[4..].copy_from_slice(user.as_bytes());
    key
}

#[inline]
pub fn period_prefix(period: PeriodId) -> [u8; 4] {
    period.to_key_bytes()
}

#[inline]
pub fn parse_payout_key(key: &[u8]) -> Option<(PeriodId, UserId)> {
    if key.len() != PAYOUT_KEY_LEN {
        return None;
    }
    let mut period = [0u8; 4];
    period.copy_from_slice(&key[..4]);
    let mut user = [0u8; 32];
    user.copy_from_slice(&key[4..]);
    Some((PeriodId::from_key_bytes(period)?, UserId::new(user)))
}
