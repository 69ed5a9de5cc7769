//! Domain layer containing the canonical transaction model.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, currency tables)
//! - `transaction` - Canonical transaction, statuses and status tables

pub mod foundation;
pub mod transaction;
