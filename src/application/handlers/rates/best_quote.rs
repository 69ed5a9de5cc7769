//! QuoteService - best exchange rate across all registered providers.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::providers::ProviderRegistry;
use crate::domain::foundation::{normalize_currency, round_to_minor_units};
use crate::ports::{ProviderError, RateCache, RateKey, AGGREGATE_QUOTE_TTL};

/// Cache namespace for aggregated quotes.
pub const AGGREGATE_PROVIDER: &str = "aggregate";

/// Best rate found across providers for one currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedQuote {
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    /// `amount * rate`, rounded to the destination currency.
    pub converted_amount: Decimal,
    /// Provider that offered the rate.
    pub provider: String,
}

/// Fans rate lookups out to every provider and keeps the highest.
pub struct QuoteService {
    registry: Arc<ProviderRegistry>,
    cache: Arc<dyn RateCache>,
    /// Winning provider per pair, read alongside the cached rate.
    winners: DashMap<(String, String), String>,
}

impl QuoteService {
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<dyn RateCache>) -> Self {
        Self {
            registry,
            cache,
            winners: DashMap::new(),
        }
    }

    /// Rate from one provider, or the default provider when none is named.
    ///
    /// A zero rate means unavailable.
    pub async fn provider_rate(
        &self,
        provider: Option<&str>,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<(&'static str, Decimal), ProviderError> {
        let provider = match provider {
            Some(name) => self.registry.resolve_by_name(name)?,
            None => self.registry.resolve(None)?,
        };
        let rate = provider.get_exchange_rate(from, to, amount).await;
        Ok((provider.name(), rate))
    }

    /// Highest positive rate any provider offers, or `None` if none has one
    /// or `amount * rate` does not fit in a `Decimal`.
    ///
    /// Results are cached for five minutes under the `aggregate` namespace.
    /// Ties go to the provider registered first.
    pub async fn best_quote(&self, from: &str, to: &str, amount: Decimal) -> Option<AggregatedQuote> {
        let from = normalize_currency(from);
        let to = normalize_currency(to);
        if from.is_empty() || to.is_empty() {
            return None;
        }

        let key = RateKey::new(AGGREGATE_PROVIDER, &from, &to);
        let pair = (from.clone(), to.clone());

        if let Some(rate) = self.cache.get(&key).await {
            let provider = self
                .winners
                .get(&pair)
                .map(|w| w.value().clone())
                .unwrap_or_else(|| AGGREGATE_PROVIDER.to_string());
            tracing::debug!(%from, %to, %rate, %provider, "Aggregated quote cache hit");
            return quote(from, to, rate, amount, provider);
        }

        let lookups = self.registry.all_providers().map(|provider| {
            let (from, to) = (from.as_str(), to.as_str());
            async move {
                (
                    provider.name(),
                    provider.get_exchange_rate(from, to, amount).await,
                )
            }
        });
        let rates = join_all(lookups).await;

        let best = rates
            .into_iter()
            .filter(|(_, rate)| *rate > Decimal::ZERO)
            .fold(None, |best: Option<(&'static str, Decimal)>, (name, rate)| match best {
                Some((_, best_rate)) if best_rate >= rate => best,
                _ => Some((name, rate)),
            });

        let Some((provider, rate)) = best else {
            tracing::warn!(%from, %to, "No provider offered a rate");
            return None;
        };

        self.winners.insert(pair, provider.to_string());
        self.cache.set(key, rate, AGGREGATE_QUOTE_TTL).await;
        tracing::debug!(%from, %to, %rate, provider, "Aggregated quote computed");

        quote(from, to, rate, amount, provider.to_string())
    }
}

fn quote(
    from: String,
    to: String,
    rate: Decimal,
    amount: Decimal,
    provider: String,
) -> Option<AggregatedQuote> {
    let Some(converted) = amount.checked_mul(rate) else {
        tracing::warn!(%from, %to, %rate, %amount, "Converted amount overflows");
        return None;
    };
    Some(AggregatedQuote {
        converted_amount: round_to_minor_units(converted, &to),
        from,
        to,
        rate,
        provider,
    })
}
