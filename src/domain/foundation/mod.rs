//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects and lookup tables that form the vocabulary
//! of the canonical transaction model.

mod currency;
mod timestamp;

pub use currency::{
    country_for_currency, minor_units, normalize_currency, round_to_minor_units,
    FALLBACK_COUNTRY,
};
pub use timestamp::Timestamp;
