//! Provider handlers.
//!
//! ## Queries
//! - List registered providers and the default choice

mod provider_health;

pub use provider_health::{GetProviderHealthHandler, GetProviderHealthQuery, ProviderHealth};
