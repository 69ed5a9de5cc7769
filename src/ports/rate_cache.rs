//! Exchange-rate cache port.
//!
//! Isolates the one piece of shared mutable state behind get / set-with-TTL,
//! so lock granularity and eviction can change without touching providers.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use std::time::Duration;

/// Lifetime of a single provider's rate lookup.
pub const RATE_TTL: Duration = Duration::from_secs(30 * 60);

/// Lifetime of an aggregated multi-provider quote.
pub const AGGREGATE_QUOTE_TTL: Duration = Duration::from_secs(5 * 60);

/// Port for the time-bounded rate cache.
///
/// Implementations must tolerate concurrent readers and writers. An entry is
/// returned verbatim until its TTL elapses and is never modified in place.
#[async_trait]
pub trait RateCache: Send + Sync {
    /// Returns the cached rate if present and not expired.
    async fn get(&self, key: &RateKey) -> Option<Decimal>;

    /// Stores a rate that expires `ttl` after insertion.
    async fn set(&self, key: RateKey, rate: Decimal, ttl: Duration);
}

/// Cache key: (provider, source currency, destination currency).
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateKey {
    provider: String,
    from: String,
    to: String,
}

impl RateKey {
    /// Creates a key; currency codes are upper-cased.
    pub fn new(provider: impl Into<String>, from: &str, to: &str) -> Self {
        Self {
            provider: provider.into(),
            from: from.trim().to_ascii_uppercase(),
            to: to.trim().to_ascii_uppercase(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn from_currency(&self) -> &str {
        &self.from
    }

    pub fn to_currency(&self) -> &str {
        &self.to
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate:{}:{}:{}", self.provider, self.from, self.to)
    }
}
