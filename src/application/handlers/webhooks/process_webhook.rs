//! ProcessWebhookHandler - Command handler for inbound provider webhooks.
//!
//! Pipeline: resolve provider → verify signature on the raw bytes →
//! normalize → hand the canonical transaction to the sink.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::adapters::providers::ProviderRegistry;
use crate::domain::foundation::Timestamp;
use crate::domain::transaction::NormalizedTransaction;
use crate::ports::{PaymentProvider, ProviderError, SinkError, TransactionSink};

/// Command to process one webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    /// Provider named by an optional request header; a preference only.
    pub provider_hint: Option<String>,
    /// Provider named by the URL path; must exist when present.
    pub route_provider: Option<String>,
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Request headers keyed by lower-case name.
    pub headers: HashMap<String, String>,
    /// When the delivery arrived.
    pub received_at: Timestamp,
}

impl ProcessWebhookCommand {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Errors surfaced to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Missing {provider} webhook signature")]
    MissingSignature { provider: &'static str },

    #[error("Invalid {provider} webhook signature")]
    SignatureVerificationFailed { provider: &'static str },

    #[error("Downstream rejected transaction: {0}")]
    Downstream(String),
}

impl From<SinkError> for WebhookError {
    fn from(err: SinkError) -> Self {
        WebhookError::Downstream(err.to_string())
    }
}

/// Handler for inbound provider webhooks.
pub struct ProcessWebhookHandler {
    registry: Arc<ProviderRegistry>,
    sink: Arc<dyn TransactionSink>,
}

impl ProcessWebhookHandler {
    pub fn new(registry: Arc<ProviderRegistry>, sink: Arc<dyn TransactionSink>) -> Self {
        Self { registry, sink }
    }

    /// Resolves the provider a delivery is addressed to.
    ///
    /// A route provider is an exact lookup; otherwise the hint and the
    /// registry's priority decide.
    fn resolve_provider(
        &self,
        route_provider: Option<&str>,
        provider_hint: Option<&str>,
    ) -> Result<Arc<dyn PaymentProvider>, WebhookError> {
        let provider = match route_provider {
            Some(name) => self.registry.resolve_by_name(name)?,
            None => self.registry.resolve(provider_hint)?,
        };
        Ok(provider)
    }

    pub async fn handle(
        &self,
        cmd: ProcessWebhookCommand,
    ) -> Result<NormalizedTransaction, WebhookError> {
        // 1. Resolve provider
        let provider =
            self.resolve_provider(cmd.route_provider.as_deref(), cmd.provider_hint.as_deref())?;
        let provider_name = provider.name();

        // 2. Verify authenticity against the raw bytes
        let signature = cmd
            .header(provider.signature_header())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if !provider.verify_signature(&cmd.payload, signature.unwrap_or_default()) {
            tracing::warn!(
                provider = provider_name,
                signature_present = signature.is_some(),
                "Webhook signature rejected"
            );
            return Err(match signature {
                None => WebhookError::MissingSignature {
                    provider: provider_name,
                },
                Some(_) => WebhookError::SignatureVerificationFailed {
                    provider: provider_name,
                },
            });
        }

        // 3. Normalize
        let transaction = provider
            .normalize_webhook(&cmd.payload, cmd.received_at)
            .map_err(|e| {
                tracing::warn!(provider = provider_name, error = %e, "Webhook payload rejected");
                e
            })?;

        // 4. Hand off downstream
        self.sink.accept(transaction.clone()).await.map_err(|e| {
            tracing::error!(
                provider = provider_name,
                transaction_id = %e.transaction_id,
                error = %e.message,
                "Transaction sink failed"
            );
            e
        })?;

        tracing::info!(
            provider = provider_name,
            transaction_id = transaction.transaction_id(),
            status = %transaction.status(),
            event_type = transaction.metadata_str("event_type").unwrap_or_default(),
            "Webhook processed"
        );

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::providers::MockPaymentProvider;
    use crate::adapters::sink::InMemoryTransactionSink;
    use crate::domain::transaction::TransactionStatus;

    const BODY: &[u8] = br#"{"id":"tx-77","currency":"KES","amount":"120.5","status":"COMPLETED"}"#;

    struct Fixture {
        wise: MockPaymentProvider,
        flutterwave: MockPaymentProvider,
        sink: Arc<InMemoryTransactionSink>,
        handler: ProcessWebhookHandler,
    }

    fn fixture_with(wise: MockPaymentProvider, sink: InMemoryTransactionSink) -> Fixture {
        let flutterwave = MockPaymentProvider::new("flutterwave");
        let mut registry = ProviderRegistry::new(false);
        registry.register(Arc::new(wise.clone()));
        registry.register(Arc::new(flutterwave.clone()));

        let sink = Arc::new(sink);
        let handler = ProcessWebhookHandler::new(Arc::new(registry), sink.clone());
        Fixture {
            wise,
            flutterwave,
            sink,
            handler,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MockPaymentProvider::new("wise"), InMemoryTransactionSink::new())
    }

    fn command(route: Option<&str>, hint: Option<&str>, signature: Option<&str>) -> ProcessWebhookCommand {
        let mut headers = HashMap::new();
        if let Some(signature) = signature {
            headers.insert("x-mock-signature".to_string(), signature.to_string());
        }
        ProcessWebhookCommand {
            provider_hint: hint.map(str::to_string),
            route_provider: route.map(str::to_string),
            payload: BODY.to_vec(),
            headers,
            received_at: Timestamp::from_unix_secs(1_710_000_000).unwrap(),
        }
    }

    #[tokio::test]
    async fn verified_webhook_reaches_sink() {
        let f = fixture();
        let tx = f
            .handler
            .handle(command(Some("wise"), None, Some("sig")))
            .await
            .unwrap();

        assert_eq!(tx.transaction_id(), "tx-77");
        assert_eq!(tx.status(), TransactionStatus::Completed);
        assert_eq!(f.sink.count(), 1);
        assert_eq!(f.sink.find("tx-77").unwrap(), tx);
    }

    #[tokio::test]
    async fn signature_read_from_resolved_provider_header() {
        let f = fixture();
        let mut cmd = command(Some("wise"), None, None);
        cmd.headers
            .insert("x-signature-sha256".to_string(), "other".to_string());
        cmd.headers
            .insert("x-mock-signature".to_string(), " sig-1 ".to_string());

        f.handler.handle(cmd).await.unwrap();

        let calls = f.wise.calls();
        let verify = calls.iter().find(|c| c.method == "verify_signature").unwrap();
        assert_eq!(verify.args[1], "sig-1");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let cmd = command(None, None, Some("sig"));
        assert_eq!(cmd.header("X-Mock-Signature"), Some("sig"));
        assert!(cmd.header("x-payment-provider").is_none());
    }

    #[tokio::test]
    async fn payload_without_timestamp_takes_receipt_time() {
        let f = fixture();
        let cmd = command(Some("wise"), None, Some("sig"));
        let received_at = cmd.received_at;

        let first = f.handler.handle(cmd.clone()).await.unwrap();
        let second = f.handler.handle(cmd).await.unwrap();

        assert_eq!(first.created_at(), received_at);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn route_provider_beats_hint() {
        let f = fixture();
        let tx = f
            .handler
            .handle(command(Some("flutterwave"), Some("wise"), Some("sig")))
            .await
            .unwrap();

        assert_eq!(tx.provider(), "flutterwave");
        assert!(f.flutterwave.was_called("normalize_webhook"));
        assert!(!f.wise.was_called("normalize_webhook"));
    }

    #[tokio::test]
    async fn hint_used_without_route() {
        let f = fixture();
        let tx = f
            .handler
            .handle(command(None, Some("flutterwave"), Some("sig")))
            .await
            .unwrap();
        assert_eq!(tx.provider(), "flutterwave");

        let tx = f.handler.handle(command(None, None, Some("sig"))).await.unwrap();
        assert_eq!(tx.provider(), "wise");
    }

    #[tokio::test]
    async fn unknown_route_provider_is_error() {
        let f = fixture();
        let err = f
            .handler
            .handle(command(Some("paystack"), None, Some("sig")))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            WebhookError::Provider(ProviderError::UnknownProvider("paystack".to_string()))
        );
    }

    #[tokio::test]
    async fn bad_signature_never_normalizes() {
        let f = fixture_with(
            MockPaymentProvider::rejecting_signatures("wise"),
            InMemoryTransactionSink::new(),
        );
        let err = f
            .handler
            .handle(command(Some("wise"), None, Some("forged")))
            .await
            .unwrap_err();

        assert_eq!(err, WebhookError::SignatureVerificationFailed { provider: "wise" });
        assert!(!f.wise.was_called("normalize_webhook"));
        assert_eq!(f.sink.count(), 0);
    }

    #[tokio::test]
    async fn rejected_without_signature_is_missing_signature() {
        let f = fixture_with(
            MockPaymentProvider::rejecting_signatures("wise"),
            InMemoryTransactionSink::new(),
        );
        let err = f
            .handler
            .handle(command(Some("wise"), None, Some("  ")))
            .await
            .unwrap_err();

        assert_eq!(err, WebhookError::MissingSignature { provider: "wise" });
    }

    #[tokio::test]
    async fn invalid_payload_is_surfaced() {
        let f = fixture();
        f.wise.set_error(ProviderError::invalid_payload("no data block"));

        let err = f
            .handler
            .handle(command(Some("wise"), None, Some("sig")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WebhookError::Provider(ProviderError::InvalidWebhookPayload(_))
        ));
        assert_eq!(f.sink.count(), 0);
    }

    #[tokio::test]
    async fn sink_failure_is_downstream_error() {
        let f = fixture_with(
            MockPaymentProvider::new("wise"),
            InMemoryTransactionSink::failing("billing offline"),
        );
        let err = f
            .handler
            .handle(command(Some("wise"), None, Some("sig")))
            .await
            .unwrap_err();

        match err {
            WebhookError::Downstream(message) => assert!(message.contains("billing offline")),
            other => panic!("expected downstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_registry_has_no_provider() {
        let handler = ProcessWebhookHandler::new(
            Arc::new(ProviderRegistry::new(false)),
            Arc::new(InMemoryTransactionSink::new()),
        );
        let err = handler.handle(command(None, None, Some("sig"))).await.unwrap_err();
        assert_eq!(err, WebhookError::Provider(ProviderError::NoProviderAvailable));
    }
}
