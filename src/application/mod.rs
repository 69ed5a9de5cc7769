//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates provider operations and coordinates between ports.
//! Webhook processing is a command; rate and provider lookups are queries.

pub mod handlers;

pub use handlers::{
    AggregatedQuote, GetProviderHealthHandler, GetProviderHealthQuery, ProcessWebhookCommand,
    ProcessWebhookHandler, ProviderHealth, QuoteService, WebhookError, AGGREGATE_PROVIDER,
};
