//! Transaction sink adapters.
//!
//! Implementations of the TransactionSink port.
//!
//! ## Available Adapters
//!
//! - `LoggingTransactionSink` - Emits each transaction as a tracing event
//! - `InMemoryTransactionSink` - Captures transactions for tests

mod in_memory;
mod logging;

pub use in_memory::InMemoryTransactionSink;
pub use logging::LoggingTransactionSink;
