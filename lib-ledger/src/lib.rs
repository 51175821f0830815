//! Append-only fund-pool ledger for the Arcadia platform economy
//!
//! All platform-level fund movements land here as immutable entries. The
//! ledger is the source of truth for pooled balances; user-facing balances
//! live in the external wallet service.

pub mod errors;
pub mod ledger;
pub mod store;
pub mod transaction;

pub use errors::{LedgerError, LedgerResult};
pub use ledger::{CurrencySummary, Ledger, LedgerSummary};
pub use store::{LedgerStore, MemoryLedgerStore, SledLedgerStore};
pub use transaction::{Transaction, TxCategory, TxDirection, TxFilter};
