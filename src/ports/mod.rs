//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Provider Ports
//!
//! - `PaymentProvider` - Capability contract for one payment provider
//! - `RateCache` - Time-bounded exchange-rate cache shared by providers
//!
//! ## Downstream Ports
//!
//! - `TransactionSink` - Receives canonical transactions (risk, billing)

mod payment_provider;
mod rate_cache;
mod transaction_sink;

pub use payment_provider::{PaymentProvider, ProviderError};
pub use rate_cache::{RateCache, RateKey, AGGREGATE_QUOTE_TTL, RATE_TTL};
pub use transaction_sink::{SinkError, TransactionSink};
