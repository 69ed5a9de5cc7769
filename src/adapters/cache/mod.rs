//! Rate cache adapters.
//!
//! Implementations of the RateCache port.
//!
//! ## Available Adapters
//!
//! - `InMemoryRateCache` - Sharded in-process cache with TTL eviction

mod in_memory;

pub use in_memory::InMemoryRateCache;
