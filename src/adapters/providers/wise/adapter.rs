//! Wise payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Wise, the primary provider.
//!
//! # Security
//!
//! - Webhooks are signed with Wise's RSA key (PKCS#1 v1.5, SHA-256)
//! - Without a configured public key every webhook is rejected
//! - The API token is held as `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = WiseConfig::new()
//!     .with_api_token(token)
//!     .with_webhook_public_key(pem);
//! let provider = WiseProvider::new(config, cache)?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};

use crate::adapters::providers::rate_lookup::cached_rate;
use crate::adapters::providers::signature::RsaSha256Verifier;
use crate::domain::foundation::Timestamp;
use crate::domain::transaction::{NormalizedTransaction, StatusTable, TransactionStatus};
use crate::ports::{PaymentProvider, ProviderError, RateCache, RATE_TTL};

use super::webhook_types::{
    WiseBalanceCreditEvent, WiseEventKind, WiseEventHeader, WiseRate, WiseTransferEvent,
};

/// Registry name of this provider.
pub const WISE: &str = "wise";

/// Header carrying the base64 RSA signature.
pub const WISE_SIGNATURE_HEADER: &str = "X-Signature-SHA256";

/// Production API host.
pub const WISE_DEFAULT_BASE_URL: &str = "https://api.transferwise.com";

/// Destination currency assumed when an event carries none.
const DEFAULT_DESTINATION_CURRENCY: &str = "USD";

/// Wise transfer and balance states.
pub static WISE_STATUS: StatusTable = StatusTable::new(
    &[
        ("incoming_payment_waiting", TransactionStatus::Pending),
        ("incoming_payment_initiated", TransactionStatus::Pending),
        ("waiting_recipient_input_to_proceed", TransactionStatus::Pending),
        ("processing", TransactionStatus::Processing),
        ("funds_converted", TransactionStatus::Processing),
        ("funds_debited", TransactionStatus::Processing),
        ("outgoing_payment_sent", TransactionStatus::Completed),
        ("credit", TransactionStatus::Completed),
        ("bounced_back", TransactionStatus::Failed),
        ("funds_refunded", TransactionStatus::Failed),
        ("charged_back", TransactionStatus::Failed),
        ("failed", TransactionStatus::Failed),
        ("cancelled", TransactionStatus::Cancelled),
    ],
    &["outgoing_payment_sent", "credit"],
);

/// Wise API configuration.
#[derive(Clone)]
pub struct WiseConfig {
    /// Bearer token for the Wise API.
    api_token: Option<SecretString>,

    /// Webhook public key (PEM or base64 DER).
    webhook_public_key: Option<String>,

    /// Base URL for the Wise API.
    base_url: String,

    /// Per-request client timeout.
    timeout: Duration,

    /// Lifetime of cached rates.
    rate_ttl: Duration,
}

impl Default for WiseConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            webhook_public_key: None,
            base_url: WISE_DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            rate_ttl: RATE_TTL,
        }
    }
}

impl WiseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    pub fn with_webhook_public_key(mut self, key: impl Into<String>) -> Self {
        self.webhook_public_key = Some(key.into());
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

    fn has_api_token(&self) -> bool {
        self.api_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().trim().is_empty())
    }
}

/// Wise payment provider adapter.
pub struct WiseProvider {
    config: WiseConfig,
    verifier: RsaSha256Verifier,
    cache: Arc<dyn RateCache>,
    http_client: reqwest::Client,
}

impl WiseProvider {
    /// Create a new Wise provider.
    ///
    /// A bad public key is logged and leaves the provider rejecting all
    /// webhooks; only HTTP client construction can fail.
    pub fn new(config: WiseConfig, cache: Arc<dyn RateCache>) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::HttpClient(e.to_string()))?;
        let verifier = RsaSha256Verifier::from_material(WISE, config.webhook_public_key.as_deref());

        if !verifier.has_key() {
            tracing::warn!(provider = WISE, "No webhook public key; all Wise webhooks will be rejected");
        }

        Ok(Self {
            config,
            verifier,
            cache,
            http_client,
        })
    }

    fn normalize_transfer(
        &self,
        payload: &[u8],
        received_at: Timestamp,
    ) -> Result<NormalizedTransaction, ProviderError> {
        let event: WiseTransferEvent = serde_json::from_slice(payload)
            .map_err(|e| ProviderError::invalid_payload(format!("Wise transfer event: {}", e)))?;
        let data = event
            .data
            .ok_or_else(|| ProviderError::invalid_payload("Wise event has no data block"))?;
        let resource = data
            .resource
            .ok_or_else(|| ProviderError::invalid_payload("Wise event has no data.resource block"))?;

        let raw_state = data.current_state.clone().unwrap_or_default();
        let status = WISE_STATUS.translate(&raw_state);
        let occurred_at = first_timestamp([
            data.occurred_at.as_deref(),
            resource.created.as_deref(),
            event.sent_at.as_deref(),
        ]);
        let completed_at = if WISE_STATUS.is_terminal_success(&raw_state) {
            occurred_at
        } else {
            None
        };

        let destination_currency = data
            .target_currency
            .or(resource.target_currency)
            .or_else(|| Some(DEFAULT_DESTINATION_CURRENCY.to_string()));

        let transaction = NormalizedTransaction::builder(WISE, received_at)
            .transaction_id_from([
                data.reference,
                resource.reference,
                resource.id.clone(),
            ])
            .customer_id(resource.profile_id.clone())
            .source(
                data.source_currency.or(resource.source_currency),
                data.source_amount.or(resource.source_amount),
            )
            .destination(
                destination_currency,
                data.target_amount.or(resource.target_amount),
            )
            .status(status)
            .created_at(occurred_at)
            .completed_at(completed_at)
            .description(Some(format!("Wise transfer {}", display_state(&raw_state))))
            .metadata("event_type", event.event_type)
            .metadata("raw_state", raw_state)
            .metadata("previous_state", data.previous_state)
            .metadata("profile_id", resource.profile_id)
            .metadata("resource_type", resource.resource_type)
            .metadata("resource_id", resource.id)
            .metadata("subscription_id", event.subscription_id)
            .build()?;

        Ok(transaction)
    }

    fn normalize_balance_credit(
        &self,
        payload: &[u8],
        received_at: Timestamp,
    ) -> Result<NormalizedTransaction, ProviderError> {
        let event: WiseBalanceCreditEvent = serde_json::from_slice(payload)
            .map_err(|e| ProviderError::invalid_payload(format!("Wise balance event: {}", e)))?;
        let data = event
            .data
            .ok_or_else(|| ProviderError::invalid_payload("Wise event has no data block"))?;
        let resource = data
            .resource
            .ok_or_else(|| ProviderError::invalid_payload("Wise event has no data.resource block"))?;

        let raw_state = data
            .transaction_type
            .clone()
            .unwrap_or_else(|| "credit".to_string());
        let status = WISE_STATUS.translate(&raw_state);
        let occurred_at = first_timestamp([
            data.occurred_at.as_deref(),
            event.sent_at.as_deref(),
            resource.created.as_deref(),
        ]);
        let completed_at = if WISE_STATUS.is_terminal_success(&raw_state) {
            occurred_at
        } else {
            None
        };

        let currency = data
            .currency
            .or(resource.target_currency)
            .or_else(|| Some(DEFAULT_DESTINATION_CURRENCY.to_string()));

        let transaction = NormalizedTransaction::builder(WISE, received_at)
            .transaction_id_from([data.reference, resource.reference, resource.id.clone()])
            .customer_id(resource.profile_id.clone())
            .source(currency.clone(), data.amount)
            .destination(currency, data.amount)
            .status(status)
            .created_at(occurred_at)
            .completed_at(completed_at)
            .description(Some("Wise balance credit".to_string()))
            .metadata("event_type", event.event_type)
            .metadata("raw_state", raw_state)
            .metadata("profile_id", resource.profile_id)
            .metadata("resource_type", resource.resource_type)
            .metadata("resource_id", resource.id)
            .metadata("channel_name", data.channel_name)
            .metadata(
                "post_transaction_balance_amount",
                data.post_transaction_balance_amount.map(|a| a.to_string()),
            )
            .build()?;

        Ok(transaction)
    }

    async fn fetch_rate(&self, from: String, to: String) -> Result<Decimal, ProviderError> {
        let token = self
            .config
            .api_token
            .as_ref()
            .ok_or_else(|| ProviderError::upstream("Wise API token not configured"))?;

        let url = format!("{}/v1/rates", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .query(&[("source", from.as_str()), ("target", to.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::upstream(format!("Wise rates request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ProviderError::upstream(format!(
                "Wise rates returned HTTP {}",
                response.status()
            )));
        }

        let rates: Vec<WiseRate> = response
            .json()
            .await
            .map_err(|e| ProviderError::upstream(format!("Wise rates body: {}", e)))?;

        rates
            .into_iter()
            .next()
            .and_then(|r| r.rate)
            .ok_or_else(|| ProviderError::upstream("Wise rates response was empty"))
    }
}

#[async_trait]
impl PaymentProvider for WiseProvider {
    fn name(&self) -> &'static str {
        WISE
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_token()
    }

    fn signature_header(&self) -> &'static str {
        WISE_SIGNATURE_HEADER
    }

    fn normalize_webhook(
        &self,
        payload: &[u8],
        received_at: Timestamp,
    ) -> Result<NormalizedTransaction, ProviderError> {
        let header: WiseEventHeader = serde_json::from_slice(payload)
            .map_err(|e| ProviderError::invalid_payload(format!("Wise webhook is not JSON: {}", e)))?;
        let event_type = header.event_type.unwrap_or_default();

        tracing::debug!(provider = WISE, event_type = %event_type, "Normalizing webhook");

        match WiseEventKind::sniff(&event_type) {
            WiseEventKind::Transfer => self.normalize_transfer(payload, received_at),
            WiseEventKind::BalanceCredit => self.normalize_balance_credit(payload, received_at),
        }
    }

    fn verify_signature(&self, payload: &[u8], signature: &str) -> bool {
        self.verifier.verify(payload, signature)
    }

    async fn get_exchange_rate(&self, from: &str, to: &str, _amount: Decimal) -> Decimal {
        cached_rate(
            self.cache.as_ref(),
            WISE,
            from,
            to,
            self.config.rate_ttl,
            |from, to| self.fetch_rate(from, to),
        )
        .await
    }
}

fn first_timestamp<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<Timestamp> {
    candidates
        .into_iter()
        .flatten()
        .find_map(Timestamp::parse)
}

fn display_state(raw_state: &str) -> &str {
    if raw_state.is_empty() {
        "state change"
    } else {
        raw_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryRateCache;
    use crate::adapters::providers::test_support::{public_key_pem, rsa_sign, spawn_stub};
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn received() -> Timestamp {
        Timestamp::parse("2024-03-01T09:20:00Z").unwrap()
    }

    fn provider_with(config: WiseConfig) -> WiseProvider {
        WiseProvider::new(config, Arc::new(InMemoryRateCache::new())).unwrap()
    }

    fn provider() -> WiseProvider {
        provider_with(
            WiseConfig::new()
                .with_api_token("wise-token")
                .with_webhook_public_key(public_key_pem()),
        )
    }

    fn transfer_event(state: &str) -> Vec<u8> {
        json!({
            "data": {
                "resource": {
                    "id": 50123,
                    "profile_id": 7788,
                    "account_id": 991,
                    "type": "transfer"
                },
                "current_state": state,
                "previous_state": "processing",
                "occurred_at": "2024-03-01T09:15:00Z",
                "source_currency": "GBP",
                "source_amount": 100,
                "target_currency": "KES",
                "target_amount": "16250.455"
            },
            "subscription_id": "f2c9a1",
            "event_type": "transfers#state-change",
            "schema_version": "2.0.0",
            "sent_at": "2024-03-01T09:15:02Z"
        })
        .to_string()
        .into_bytes()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Normalization
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn normalizes_transfer_state_change() {
        let tx = provider()
            .normalize_webhook(&transfer_event("funds_converted"), received())
            .unwrap();

        assert_eq!(tx.provider(), "wise");
        assert_eq!(tx.transaction_id(), "50123");
        assert_eq!(tx.customer_id(), "7788");
        assert_eq!(tx.source_currency(), "GBP");
        assert_eq!(tx.source_amount(), dec!(100));
        assert_eq!(tx.source_country(), "GB");
        assert_eq!(tx.destination_currency(), "KES");
        assert_eq!(tx.destination_amount(), dec!(16250.46));
        assert_eq!(tx.destination_country(), "KE");
        assert_eq!(tx.status(), TransactionStatus::Processing);
        assert!(tx.completed_at().is_none());
        assert_eq!(tx.metadata_str("event_type"), Some("transfers#state-change"));
        assert_eq!(tx.metadata_str("previous_state"), Some("processing"));
        assert_eq!(tx.metadata_str("profile_id"), Some("7788"));
        assert_eq!(tx.metadata_str("resource_type"), Some("transfer"));
        assert_eq!(tx.metadata_str("raw_state"), Some("funds_converted"));
    }

    #[test]
    fn terminal_success_sets_completed_at_from_event_time() {
        let tx = provider()
            .normalize_webhook(&transfer_event("outgoing_payment_sent"), received())
            .unwrap();

        assert_eq!(tx.status(), TransactionStatus::Completed);
        let completed = tx.completed_at().unwrap();
        assert_eq!(completed, Timestamp::parse("2024-03-01T09:15:00Z").unwrap());
    }

    #[test]
    fn resource_fields_fill_gaps_in_event_fields() {
        let payload = json!({
            "event_type": "transfers#state-change",
            "data": {
                "current_state": "processing",
                "resource": {
                    "id": 1,
                    "reference": "INV-2024-0042",
                    "source_currency": "USD",
                    "source_amount": "250.00",
                    "target_currency": "NGN",
                    "target_amount": 380000
                }
            }
        })
        .to_string();

        let tx = provider().normalize_webhook(payload.as_bytes(), received()).unwrap();
        assert_eq!(tx.transaction_id(), "INV-2024-0042");
        assert_eq!(tx.source_amount(), dec!(250));
        assert_eq!(tx.destination_currency(), "NGN");
        assert_eq!(tx.destination_country(), "NG");
    }

    #[test]
    fn missing_target_currency_defaults_to_usd() {
        let payload = json!({
            "event_type": "transfers#state-change",
            "data": {"current_state": "processing", "resource": {"id": 9}}
        })
        .to_string();

        let tx = provider().normalize_webhook(payload.as_bytes(), received()).unwrap();
        assert_eq!(tx.destination_currency(), "USD");
        assert_eq!(tx.destination_country(), "US");
        assert_eq!(tx.destination_amount(), Decimal::ZERO);
    }

    #[test]
    fn normalizes_balance_credit() {
        let payload = json!({
            "event_type": "balances#credit",
            "schema_version": "2.0.0",
            "sent_at": "2024-03-02T12:00:05Z",
            "data": {
                "resource": {"type": "balance-account", "id": 111, "profile_id": 222},
                "transaction_type": "credit",
                "amount": 1250.5,
                "currency": "GHS",
                "post_transaction_balance_amount": 3000.5,
                "occurred_at": "2024-03-02T12:00:00Z",
                "channel_name": "TRANSFER"
            }
        })
        .to_string();

        let tx = provider().normalize_webhook(payload.as_bytes(), received()).unwrap();
        assert_eq!(tx.status(), TransactionStatus::Completed);
        assert!(tx.completed_at().is_some());
        assert_eq!(tx.destination_currency(), "GHS");
        assert_eq!(tx.destination_amount(), dec!(1250.50));
        assert_eq!(tx.destination_country(), "GH");
        assert_eq!(tx.customer_id(), "222");
        assert_eq!(tx.metadata_str("event_type"), Some("balances#credit"));
        assert_eq!(tx.metadata_str("raw_state"), Some("credit"));
    }

    #[test]
    fn unknown_event_type_is_parsed_as_transfer() {
        let payload = json!({
            "event_type": "transfers#active-cases",
            "data": {"current_state": "bounced_back", "resource": {"id": 5}}
        })
        .to_string();

        let tx = provider().normalize_webhook(payload.as_bytes(), received()).unwrap();
        assert_eq!(tx.status(), TransactionStatus::Failed);
    }

    #[test]
    fn missing_data_block_is_invalid_payload() {
        let payload = br#"{"event_type":"transfers#state-change"}"#;
        let err = provider().normalize_webhook(payload, received()).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidWebhookPayload(_)));
    }

    #[test]
    fn missing_resource_block_is_invalid_payload() {
        let payload = br#"{"event_type":"transfers#state-change","data":{"current_state":"processing"}}"#;
        let err = provider().normalize_webhook(payload, received()).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidWebhookPayload(_)));
    }

    #[test]
    fn non_json_is_invalid_payload() {
        let err = provider().normalize_webhook(b"state=processing", received()).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidWebhookPayload(_)));
    }

    #[test]
    fn negative_amount_is_invalid_payload() {
        let payload = json!({
            "event_type": "transfers#state-change",
            "data": {
                "current_state": "processing",
                "target_currency": "EUR",
                "target_amount": -5,
                "resource": {"id": 5}
            }
        })
        .to_string();

        let err = provider().normalize_webhook(payload.as_bytes(), received()).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidWebhookPayload(_)));
    }

    #[test]
    fn normalization_is_idempotent_with_real_id() {
        let provider = provider();
        let payload = transfer_event("outgoing_payment_sent");

        let first = provider.normalize_webhook(&payload, received()).unwrap();
        let second = provider.normalize_webhook(&payload, received()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn timestampless_event_normalizes_identically() {
        let provider = provider();
        let payload = br#"{"event_type":"transfers#state-change","data":{"current_state":"outgoing_payment_sent","target_currency":"KES","resource":{"id":42}}}"#;

        let first = provider.normalize_webhook(payload, received()).unwrap();
        let second = provider.normalize_webhook(payload, received()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.created_at(), received());
        assert_eq!(first.completed_at(), Some(received()));
    }

    #[test]
    fn no_id_candidates_falls_back_to_uuid() {
        let payload = br#"{"event_type":"transfers#state-change","data":{"resource":{}}}"#;
        let tx = provider().normalize_webhook(payload, received()).unwrap();
        assert!(uuid::Uuid::parse_str(tx.transaction_id()).is_ok());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Status Table
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn every_defined_state_has_exactly_one_status() {
        for state in WISE_STATUS.states() {
            assert!(WISE_STATUS.lookup(state).is_some(), "{} unmapped", state);
            assert_eq!(
                WISE_STATUS.states().filter(|s| *s == state).count(),
                1,
                "{} listed twice",
                state
            );
        }
    }

    #[test]
    fn terminal_success_states_map_to_completed() {
        assert_eq!(WISE_STATUS.translate("outgoing_payment_sent"), TransactionStatus::Completed);
        assert_eq!(WISE_STATUS.translate("credit"), TransactionStatus::Completed);
        assert_eq!(WISE_STATUS.translate("cancelled"), TransactionStatus::Cancelled);
        assert_eq!(WISE_STATUS.translate("charged_back"), TransactionStatus::Failed);
    }

    proptest! {
        #[test]
        fn undefined_states_default_to_pending(raw in "[a-z_#]{0,32}") {
            prop_assume!(WISE_STATUS.lookup(&raw).is_none());
            prop_assert_eq!(WISE_STATUS.translate(&raw), TransactionStatus::Pending);
        }

        #[test]
        fn undefined_states_never_complete(raw in "\\PC{0,40}") {
            let status = WISE_STATUS.translate(&raw);
            if status == TransactionStatus::Completed {
                prop_assert!(WISE_STATUS.is_terminal_success(&raw));
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Signatures
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn genuine_signature_verifies() {
        let payload = transfer_event("processing");
        let signature = rsa_sign(&payload);
        assert!(provider().verify_signature(&payload, &signature));
    }

    #[test]
    fn one_flipped_byte_invalidates_signature() {
        let mut payload = transfer_event("processing");
        let signature = rsa_sign(&payload);
        payload[10] ^= 0x01;
        assert!(!provider().verify_signature(&payload, &signature));
    }

    #[test]
    fn without_public_key_genuine_signature_is_rejected() {
        let provider = provider_with(WiseConfig::new().with_api_token("wise-token"));
        let payload = transfer_event("processing");
        let signature = rsa_sign(&payload);
        assert!(!provider.verify_signature(&payload, &signature));
    }

    #[test]
    fn configured_requires_api_token() {
        assert!(provider().is_configured());
        assert!(!provider_with(WiseConfig::new()).is_configured());
        assert!(!provider_with(WiseConfig::new().with_api_token("  ")).is_configured());
        assert_eq!(provider().signature_header(), "X-Signature-SHA256");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Exchange Rates
    // ════════════════════════════════════════════════════════════════════════════

    fn rates_stub(hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/v1/rates",
            get(
                move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        if auth != "Bearer wise-token" {
                            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "auth"})));
                        }
                        let source = query.get("source").cloned().unwrap_or_default();
                        let target = query.get("target").cloned().unwrap_or_default();
                        (
                            StatusCode::OK,
                            Json(json!([{
                                "rate": 162.5043,
                                "source": source,
                                "target": target,
                                "time": "2024-03-01T09:00:00+0000"
                            }])),
                        )
                    }
                },
            ),
        )
    }

    #[tokio::test]
    async fn rate_is_fetched_once_then_served_from_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_stub(rates_stub(hits.clone())).await;
        let provider = provider_with(
            WiseConfig::new()
                .with_api_token("wise-token")
                .with_base_url(base_url),
        );

        let first = provider.get_exchange_rate("gbp", "kes", dec!(100)).await;
        let second = provider.get_exchange_rate("GBP", "KES", dec!(999)).await;

        assert_eq!(first, dec!(162.5043));
        assert_eq!(second, dec!(162.5043));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_rate_is_refetched() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_stub(rates_stub(hits.clone())).await;
        let provider = provider_with(
            WiseConfig::new()
                .with_api_token("wise-token")
                .with_base_url(base_url)
                .with_rate_ttl(Duration::from_millis(50)),
        );

        provider.get_exchange_rate("GBP", "KES", dec!(1)).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        provider.get_exchange_rate("GBP", "KES", dec!(1)).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn upstream_rejection_yields_zero_and_is_not_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_stub(rates_stub(hits.clone())).await;
        let provider = provider_with(
            WiseConfig::new()
                .with_api_token("wrong-token")
                .with_base_url(base_url),
        );

        assert_eq!(provider.get_exchange_rate("GBP", "KES", dec!(1)).await, Decimal::ZERO);
        assert_eq!(provider.get_exchange_rate("GBP", "KES", dec!(1)).await, Decimal::ZERO);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_rate_array_yields_zero() {
        let router = Router::new().route("/v1/rates", get(|| async { Json(json!([])) }));
        let base_url = spawn_stub(router).await;
        let provider = provider_with(
            WiseConfig::new()
                .with_api_token("wise-token")
                .with_base_url(base_url),
        );

        assert_eq!(provider.get_exchange_rate("GBP", "KES", dec!(1)).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn same_currency_needs_no_upstream() {
        let provider = provider_with(
            WiseConfig::new()
                .with_api_token("wise-token")
                .with_base_url("http://127.0.0.1:9"),
        );
        assert_eq!(provider.get_exchange_rate("usd", "USD", dec!(5)).await, Decimal::ONE);
    }
}
