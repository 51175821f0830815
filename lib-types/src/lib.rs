//! Arcadia platform economy primitives.
//! Stable, engine-neutral, behavior-free.
//!
//! Rule: no string identifiers in persisted state. Ever.

pub mod currency;
pub mod primitives;

pub use currency::{Currency, CurrencyError};
pub use primitives::{
    format_amount, to_ppm, Amount, Bps, GrantId, PeriodId, TxId, UserId, AMOUNT_SCALE, BPS_SCALE,
    PPM_SCALE,
};
