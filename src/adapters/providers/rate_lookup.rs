//! Cache-fronted exchange-rate lookup shared by every provider.
//!
//! Hit: return the cached rate. Miss: call the provider's fetch once, cache
//! a positive result for `ttl`, return it. Any failure degrades to
//! `Decimal::ZERO` with a warning; failures are never cached.

use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::normalize_currency;
use crate::ports::{ProviderError, RateCache, RateKey};

pub(crate) async fn cached_rate<F, Fut>(
    cache: &dyn RateCache,
    provider: &'static str,
    from: &str,
    to: &str,
    ttl: Duration,
    fetch: F,
) -> Decimal
where
    F: FnOnce(String, String) -> Fut,
    Fut: Future<Output = Result<Decimal, ProviderError>>,
{
    let from = normalize_currency(from);
    let to = normalize_currency(to);

    if from.is_empty() || to.is_empty() {
        tracing::warn!(provider, %from, %to, "Rate lookup with empty currency code");
        return Decimal::ZERO;
    }
    if from == to {
        return Decimal::ONE;
    }

    let key = RateKey::new(provider, &from, &to);
    if let Some(rate) = cache.get(&key).await {
        tracing::debug!(provider, %from, %to, %rate, "Exchange rate cache hit");
        return rate;
    }

    match fetch(from.clone(), to.clone()).await {
        Ok(rate) if rate > Decimal::ZERO => {
            tracing::debug!(provider, %from, %to, %rate, "Exchange rate fetched");
            cache.set(key, rate, ttl).await;
            rate
        }
        Ok(rate) => {
            tracing::warn!(provider, %from, %to, %rate, "Provider returned a non-positive rate");
            Decimal::ZERO
        }
        Err(e) => {
            tracing::warn!(provider, %from, %to, error = %e, "Exchange rate unavailable");
            Decimal::ZERO
        }
    }
}
