//! Exchange-rate handlers.
//!
//! ## Queries
//! - Single-provider rate lookup
//! - Best quote across all providers

mod best_quote;

pub use best_quote::{AggregatedQuote, QuoteService, AGGREGATE_PROVIDER};
