//! Canonical transaction model.
//!
//! `NormalizedTransaction` is the only shape risk scoring and billing see.
//! Provider adapters translate their raw states through a `StatusTable`
//! and assemble the record with `NormalizedTransactionBuilder`.

mod normalized;
mod status;

pub use normalized::{
    NormalizedTransaction, NormalizedTransactionBuilder, TransactionError, UNKNOWN_CUSTOMER,
};
pub use status::{StatusTable, TransactionStatus};
