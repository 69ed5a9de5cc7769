//! Application handlers.
//!
//! Command and query handlers that orchestrate provider operations.

pub mod providers;
pub mod rates;
pub mod webhooks;

pub use providers::{GetProviderHealthHandler, GetProviderHealthQuery, ProviderHealth};
pub use rates::{AggregatedQuote, QuoteService, AGGREGATE_PROVIDER};
pub use webhooks::{ProcessWebhookCommand, ProcessWebhookHandler, WebhookError};
