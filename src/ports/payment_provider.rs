//! Payment provider port: the capability contract every provider implements.
//!
//! A provider bundles one webhook normalizer, one signature verifier and one
//! exchange-rate lookup behind a stable name. The registry hands providers
//! out as `Arc<dyn PaymentProvider>` so callers never see provider types.
//!
//! # Design
//!
//! - **Fail loud on structure**: `normalize_webhook` returns an error instead
//!   of a partially filled record
//! - **Boolean authenticity**: `verify_signature` answers yes/no and leaves
//!   the rejection decision to the caller
//! - **Fail soft on rates**: `get_exchange_rate` returns zero when the rate is
//!   unavailable

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::foundation::Timestamp;
use crate::domain::transaction::{NormalizedTransaction, TransactionError};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Stable lower-case provider name (`"wise"`, `"flutterwave"`).
    fn name(&self) -> &'static str;

    /// Whether the credentials needed to talk to the provider are present.
    fn is_configured(&self) -> bool;

    /// HTTP header that carries this provider's webhook signature.
    fn signature_header(&self) -> &'static str;

    /// Parse a raw webhook body into the canonical transaction.
    ///
    /// `received_at` is the delivery's arrival time and becomes `created_at`
    /// when the body carries no timestamp. Same inputs, same output.
    ///
    /// # Errors
    ///
    /// `ProviderError::InvalidWebhookPayload` when the body is not JSON or
    /// lacks the provider's mandatory data block.
    fn normalize_webhook(
        &self,
        payload: &[u8],
        received_at: Timestamp,
    ) -> Result<NormalizedTransaction, ProviderError>;

    /// Check the signature token against the raw body.
    ///
    /// Pure: the same inputs always produce the same answer.
    fn verify_signature(&self, payload: &[u8], signature: &str) -> bool;

    /// Look up the `from` → `to` conversion rate.
    ///
    /// Returns `Decimal::ZERO` when no rate could be obtained; callers must
    /// read zero as "unavailable".
    async fn get_exchange_rate(&self, from: &str, to: &str, amount: Decimal) -> Decimal;
}

/// Errors from provider resolution and webhook normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Invalid webhook payload: {0}")]
    InvalidWebhookPayload(String),

    #[error("Unknown payment provider: {0}")]
    UnknownProvider(String),

    #[error("No payment provider available")]
    NoProviderAvailable,

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl ProviderError {
    /// Create an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidWebhookPayload(message.into())
    }

    /// Create an upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(message.into())
    }

    /// Short machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::InvalidWebhookPayload(_) => "invalid_webhook_payload",
            ProviderError::UnknownProvider(_) => "unknown_provider",
            ProviderError::NoProviderAvailable => "no_provider_available",
            ProviderError::UpstreamUnavailable(_) => "upstream_unavailable",
            ProviderError::HttpClient(_) => "http_client",
        }
    }
}

impl From<TransactionError> for ProviderError {
    fn from(err: TransactionError) -> Self {
        ProviderError::InvalidWebhookPayload(err.to_string())
    }
}
