//! In-memory rate cache backed by a sharded concurrent map.
//!
//! Writers lock only the shard holding their key, so lookups for unrelated
//! currency pairs are not stalled. Expired entries are dropped lazily on
//! lookup and in bulk by [`InMemoryRateCache::purge_expired`].

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::ports::{RateCache, RateKey};

/// Process-local rate cache shared by every provider.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateCache {
    entries: Arc<DashMap<RateKey, CacheEntry>>,
}

/// A cached rate and the instant it stops being valid.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    rate: Decimal,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

impl InMemoryRateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every expired entry, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        purge(&self.entries)
    }

    /// Spawns a task that purges expired entries every `interval`.
    ///
    /// The task runs until the returned handle is aborted or the runtime
    /// shuts down.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let entries = Arc::clone(&self.entries);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = purge(&entries);
                if removed > 0 {
                    tracing::debug!(removed, remaining = entries.len(), "Purged expired rates");
                }
            }
        })
    }
}

fn purge(entries: &DashMap<RateKey, CacheEntry>) -> usize {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    before.saturating_sub(entries.len())
}

#[async_trait]
impl RateCache for InMemoryRateCache {
    async fn get(&self, key: &RateKey) -> Option<Decimal> {
        let now = Instant::now();
        // Copy out so the shard guard is released before any removal.
        let cached = self.entries.get(key).map(|entry| *entry);

        match cached {
            Some(entry) if entry.is_live(now) => Some(entry.rate),
            Some(_) => {
                self.entries.remove_if(key, |_, entry| !entry.is_live(now));
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: RateKey, rate: Decimal, ttl: Duration) {
        let entry = CacheEntry {
            rate,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key, entry);
    }
}
