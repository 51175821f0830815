//! Key encoding for the sled-backed ledger log
//!
//! Entries are keyed by a monotonic sequence number encoded big-endian so
//! that sled's lexicographic iteration order is append order.

/// Length of a sequence key in bytes
pub const SEQ_KEY_LEN: usize = 8;

#[inline]
pub fn tx_seq_key(seq: u64) -> [u8; SEQ_KEY_LEN] {
    seq.to_be_bytes()
}

#[inline]
pub fn parse_tx_seq(key: &[u8]) -> Option<u64> {
    let bytes: [u8; SEQ_KEY_LEN] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}
