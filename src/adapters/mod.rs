//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `providers` - Wise and Flutterwave clients, plus the provider registry
//! - `cache` - In-memory exchange-rate cache
//! - `sink` - Downstream transaction sinks
//! - `http` - Axum endpoints for webhooks and rates

pub mod cache;
pub mod http;
pub mod providers;
pub mod sink;

pub use cache::InMemoryRateCache;
pub use providers::ProviderRegistry;
pub use sink::{InMemoryTransactionSink, LoggingTransactionSink};
