//! Mock payment provider for testing.
//!
//! Provides a configurable implementation of `PaymentProvider` for unit and
//! integration tests. Supports:
//! - Pre-configured transactions and rates
//! - Error injection
//! - Call tracking
//! - Accepting or rejecting every signature

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::foundation::Timestamp;
use crate::domain::transaction::{NormalizedTransaction, TransactionStatus};
use crate::ports::{PaymentProvider, ProviderError};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new("wise");
/// mock.set_rate("USD", "NGN", dec!(1500));
/// mock.set_error(ProviderError::invalid_payload("boom"));
/// ```
#[derive(Clone)]
pub struct MockPaymentProvider {
    name: &'static str,
    configured: bool,
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Returned by the next `normalize_webhook` call instead of parsing.
    next_transaction: Option<NormalizedTransaction>,

    /// Returned (once) by the next `normalize_webhook` call.
    next_error: Option<ProviderError>,

    /// Rates by `FROM:TO`.
    rates: HashMap<String, Decimal>,

    reject_signatures: bool,

    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// A configured mock that accepts every signature.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            configured: true,
            inner: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// A mock whose `is_configured` is false.
    pub fn unconfigured(name: &'static str) -> Self {
        Self {
            configured: false,
            ..Self::new(name)
        }
    }

    /// A mock that fails every signature check.
    pub fn rejecting_signatures(name: &'static str) -> Self {
        let mock = Self::new(name);
        mock.state().reject_signatures = true;
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn set_transaction(&self, transaction: NormalizedTransaction) {
        self.state().next_transaction = Some(transaction);
    }

    pub fn set_error(&self, error: ProviderError) {
        self.state().next_error = Some(error);
    }

    pub fn set_rate(&self, from: &str, to: &str, rate: Decimal) {
        self.state().rates.insert(rate_key(from, to), rate);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn signature_header(&self) -> &'static str {
        "x-mock-signature"
    }

    /// Returns the configured transaction, or builds one from a flat
    /// `{id, currency, amount, status}` JSON body.
    fn normalize_webhook(
        &self,
        payload: &[u8],
        received_at: Timestamp,
    ) -> Result<NormalizedTransaction, ProviderError> {
        self.record_call("normalize_webhook", vec![payload.len().to_string()]);

        let mut state = self.state();
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(transaction) = state.next_transaction.clone() {
            return Ok(transaction);
        }
        drop(state);

        let body: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| ProviderError::invalid_payload(e.to_string()))?;
        let status = body
            .get("status")
            .cloned()
            .and_then(|s| serde_json::from_value::<TransactionStatus>(s).ok())
            .unwrap_or_default();
        let amount = body
            .get("amount")
            .and_then(super::json::decimal_from_json);

        let transaction = NormalizedTransaction::builder(self.name, received_at)
            .transaction_id_from([body.get("id").and_then(|v| v.as_str())])
            .destination(
                Some(
                    body.get("currency")
                        .and_then(|v| v.as_str())
                        .unwrap_or("USD")
                        .to_string(),
                ),
                amount,
            )
            .status(status)
            .metadata("event_type", "mock")
            .build()?;

        Ok(transaction)
    }

    fn verify_signature(&self, payload: &[u8], signature: &str) -> bool {
        self.record_call(
            "verify_signature",
            vec![payload.len().to_string(), signature.to_string()],
        );
        !self.state().reject_signatures
    }

    async fn get_exchange_rate(&self, from: &str, to: &str, amount: Decimal) -> Decimal {
        self.record_call(
            "get_exchange_rate",
            vec![from.to_string(), to.to_string(), amount.to_string()],
        );
        self.state()
            .rates
            .get(&rate_key(from, to))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

fn rate_key(from: &str, to: &str) -> String {
    format!("{}:{}", from.trim().to_ascii_uppercase(), to.trim().to_ascii_uppercase())
}
