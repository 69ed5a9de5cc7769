//! Flutterwave payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Flutterwave, the secondary
//! provider.
//!
//! # Security
//!
//! - Webhooks carry a hex HMAC-SHA256 of the raw body keyed with the
//!   dashboard "secret hash"
//! - Digests are compared in constant time
//! - Without a configured secret hash every webhook is ACCEPTED; this is
//!   only acceptable for local development
//!
//! # Configuration
//!
//! ```ignore
//! let config = FlutterwaveConfig::new()
//!     .with_secret_key(key)
//!     .with_webhook_secret_hash(hash);
//! let provider = FlutterwaveProvider::new(config, cache)?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};

use crate::adapters::providers::rate_lookup::cached_rate;
use crate::adapters::providers::signature::{HmacSha256Verifier, MissingSecretPolicy};
use crate::domain::foundation::{normalize_currency, Timestamp};
use crate::domain::transaction::{NormalizedTransaction, StatusTable, TransactionStatus};
use crate::ports::{PaymentProvider, ProviderError, RateCache, RATE_TTL};

use super::webhook_types::{
    FlutterwaveChargeData, FlutterwaveEnvelope, FlutterwaveEventKind, FlutterwaveEventHeader,
    FlutterwaveRateResponse, FlutterwaveTransferData,
};

/// Registry name of this provider.
pub const FLUTTERWAVE: &str = "flutterwave";

/// Header carrying the hex HMAC signature.
pub const FLUTTERWAVE_SIGNATURE_HEADER: &str = "flutterwave-signature";

/// Production API host.
pub const FLUTTERWAVE_DEFAULT_BASE_URL: &str = "https://api.flutterwave.com";

/// Destination currency assumed when an event carries none.
const DEFAULT_DESTINATION_CURRENCY: &str = "NGN";

/// Flutterwave charge and transfer states.
pub static FLUTTERWAVE_STATUS: StatusTable = StatusTable::new(
    &[
        ("new", TransactionStatus::Pending),
        ("pending", TransactionStatus::Pending),
        ("queued", TransactionStatus::Pending),
        ("processing", TransactionStatus::Processing),
        ("successful", TransactionStatus::Completed),
        ("success", TransactionStatus::Completed),
        ("completed", TransactionStatus::Completed),
        ("failed", TransactionStatus::Failed),
        ("error", TransactionStatus::Failed),
        ("cancelled", TransactionStatus::Cancelled),
        ("reversed", TransactionStatus::Cancelled),
    ],
    &["successful", "success", "completed"],
);

/// Flutterwave API configuration.
#[derive(Clone)]
pub struct FlutterwaveConfig {
    /// Secret API key (FLWSECK-...).
    secret_key: Option<SecretString>,

    /// Webhook secret hash set in the dashboard.
    webhook_secret_hash: Option<SecretString>,

    base_url: String,

    timeout: Duration,

    rate_ttl: Duration,
}

impl Default for FlutterwaveConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            webhook_secret_hash: None,
            base_url: FLUTTERWAVE_DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            rate_ttl: RATE_TTL,
        }
    }
}

impl FlutterwaveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret_key(mut self, key: impl Into<String>) -> Self {
        self.secret_key = Some(SecretString::new(key.into()));
        self
    }

    pub fn with_webhook_secret_hash(mut self, hash: impl Into<String>) -> Self {
        self.webhook_secret_hash = Some(SecretString::new(hash.into()));
        self
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rate_ttl(mut self, ttl: Duration) -> Self {
        self.rate_ttl = ttl;
        self
    }

    fn has_secret_key(&self) -> bool {
        self.secret_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }
}

/// Flutterwave payment provider adapter.
pub struct FlutterwaveProvider {
    config: FlutterwaveConfig,
    verifier: HmacSha256Verifier,
    cache: Arc<dyn RateCache>,
    http_client: reqwest::Client,
}

impl FlutterwaveProvider {
    pub fn new(config: FlutterwaveConfig, cache: Arc<dyn RateCache>) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::HttpClient(e.to_string()))?;
        let verifier = HmacSha256Verifier::new(
            FLUTTERWAVE,
            config.webhook_secret_hash.clone(),
            MissingSecretPolicy::FailOpen,
        );

        Ok(Self {
            config,
            verifier,
            cache,
            http_client,
        })
    }

    /// Whether webhooks are actually checked. False means every webhook is
    /// accepted unverified.
    pub fn verifies_webhooks(&self) -> bool {
        self.verifier.has_secret()
    }

    fn normalize_charge(
        &self,
        payload: &[u8],
        received_at: Timestamp,
    ) -> Result<NormalizedTransaction, ProviderError> {
        let envelope: FlutterwaveEnvelope<FlutterwaveChargeData> = serde_json::from_slice(payload)
            .map_err(|e| ProviderError::invalid_payload(format!("Flutterwave charge event: {}", e)))?;
        let data = envelope
            .data
            .ok_or_else(|| ProviderError::invalid_payload("Flutterwave event has no data block"))?;

        let event = envelope.event.unwrap_or_default();
        let raw_state = raw_state(data.status.as_deref(), &event);
        let status = FLUTTERWAVE_STATUS.translate(&raw_state);
        let created_at = data.created_at.as_deref().and_then(Timestamp::parse);

        let currency = data
            .currency
            .clone()
            .or_else(|| Some(DEFAULT_DESTINATION_CURRENCY.to_string()));
        let customer = data.customer.unwrap_or_default();
        let card_country = data.card.as_ref().and_then(|c| c.country_code());

        let transaction = NormalizedTransaction::builder(FLUTTERWAVE, received_at)
            .transaction_id_from([data.tx_ref, data.flw_ref.clone(), data.id])
            .customer_id(customer.id)
            .customer_email(customer.email)
            .source(currency.clone(), data.charged_amount.or(data.amount))
            .destination(currency, data.amount)
            .source_country(card_country)
            .status(status)
            .created_at(created_at)
            .description(data.narration)
            .metadata("event_type", event)
            .metadata("event_category", envelope.event_category)
            .metadata("raw_state", raw_state)
            .metadata("flw_ref", data.flw_ref)
            .metadata("processor_response", data.processor_response)
            .metadata("payment_type", data.payment_type)
            .build()?;

        Ok(transaction)
    }

    fn normalize_transfer(
        &self,
        payload: &[u8],
        received_at: Timestamp,
    ) -> Result<NormalizedTransaction, ProviderError> {
        let envelope: FlutterwaveEnvelope<FlutterwaveTransferData> =
            serde_json::from_slice(payload).map_err(|e| {
                ProviderError::invalid_payload(format!("Flutterwave transfer event: {}", e))
            })?;
        let data = envelope
            .data
            .ok_or_else(|| ProviderError::invalid_payload("Flutterwave event has no data block"))?;

        let event = envelope.event.unwrap_or_default();
        let raw_state = raw_state(data.status.as_deref(), &event);
        let status = FLUTTERWAVE_STATUS.translate(&raw_state);
        let created_at = data.created_at.as_deref().and_then(Timestamp::parse);

        let destination_currency = data
            .currency
            .clone()
            .or_else(|| data.meta_str("destination_currency"))
            .or_else(|| Some(DEFAULT_DESTINATION_CURRENCY.to_string()));
        let source_currency = data
            .debit_currency
            .clone()
            .or_else(|| data.meta_str("source_currency"))
            .or_else(|| destination_currency.clone());

        // The payload only states the beneficiary amount; it is the source
        // amount too unless the transfer crossed currencies.
        let same_currency = match (&source_currency, &destination_currency) {
            (Some(s), Some(d)) => normalize_currency(s) == normalize_currency(d),
            _ => true,
        };
        let source_amount = if same_currency { data.amount } else { None };

        let transaction = NormalizedTransaction::builder(FLUTTERWAVE, received_at)
            .transaction_id_from([data.reference.clone(), data.id.clone()])
            .source(source_currency, source_amount)
            .destination(destination_currency, data.amount)
            .status(status)
            .created_at(created_at)
            .description(data.narration.clone())
            .metadata("event_type", event)
            .metadata("event_category", envelope.event_category)
            .metadata("raw_state", raw_state)
            .metadata("processor_response", data.complete_message.clone())
            .metadata("beneficiary_name", data.fullname.clone())
            .metadata("bank_name", data.bank_name.clone())
            .metadata("fee", data.fee.map(|f| f.to_string()))
            .build()?;

        Ok(transaction)
    }

    async fn fetch_rate(
        &self,
        from: String,
        to: String,
        amount: Decimal,
    ) -> Result<Decimal, ProviderError> {
        let secret_key = self
            .config
            .secret_key
            .as_ref()
            .ok_or_else(|| ProviderError::upstream("Flutterwave secret key not configured"))?;

        let amount = if amount > Decimal::ZERO {
            amount
        } else {
            Decimal::ONE
        };

        let url = format!("{}/v3/transfers/rates", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(secret_key.expose_secret())
            .query(&[
                ("amount", amount.to_string()),
                ("source_currency", from),
                ("destination_currency", to),
            ])
            .send()
            .await
            .map_err(|e| {
                ProviderError::upstream(format!("Flutterwave rates request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::upstream(format!(
                "Flutterwave rates returned HTTP {}",
                response.status()
            )));
        }

        let body: FlutterwaveRateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::upstream(format!("Flutterwave rates body: {}", e)))?;

        if !body
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("success"))
        {
            return Err(ProviderError::upstream(format!(
                "Flutterwave rates status {:?}: {}",
                body.status,
                body.message.unwrap_or_default()
            )));
        }

        body.data
            .and_then(|d| d.rate)
            .ok_or_else(|| ProviderError::upstream("Flutterwave rates response had no rate"))
    }
}

#[async_trait]
impl PaymentProvider for FlutterwaveProvider {
    fn name(&self) -> &'static str {
        FLUTTERWAVE
    }

    fn is_configured(&self) -> bool {
        self.config.has_secret_key()
    }

    fn signature_header(&self) -> &'static str {
        FLUTTERWAVE_SIGNATURE_HEADER
    }

    fn normalize_webhook(
        &self,
        payload: &[u8],
        received_at: Timestamp,
    ) -> Result<NormalizedTransaction, ProviderError> {
        let header: FlutterwaveEventHeader = serde_json::from_slice(payload).map_err(|e| {
            ProviderError::invalid_payload(format!("Flutterwave webhook is not JSON: {}", e))
        })?;
        let event = header.event.unwrap_or_default();

        tracing::debug!(provider = FLUTTERWAVE, event_type = %event, "Normalizing webhook");

        match FlutterwaveEventKind::sniff(&event) {
            FlutterwaveEventKind::Charge => self.normalize_charge(payload, received_at),
            FlutterwaveEventKind::Transfer => self.normalize_transfer(payload, received_at),
        }
    }

    fn verify_signature(&self, payload: &[u8], signature: &str) -> bool {
        self.verifier.verify(payload, signature)
    }

    async fn get_exchange_rate(&self, from: &str, to: &str, amount: Decimal) -> Decimal {
        cached_rate(
            self.cache.as_ref(),
            FLUTTERWAVE,
            from,
            to,
            self.config.rate_ttl,
            |from, to| self.fetch_rate(from, to, amount),
        )
        .await
    }
}

/// The data-level status wins; otherwise the event suffix
/// (`charge.completed` → `completed`).
fn raw_state(status: Option<&str>, event: &str) -> String {
    status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| event.rsplit_once('.').map(|(_, suffix)| suffix.to_string()))
        .unwrap_or_default()
}
