//! The canonical, provider-agnostic transaction record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::foundation::{
    country_for_currency, normalize_currency, round_to_minor_units, Timestamp,
};

use super::status::TransactionStatus;

/// Customer identifier used when a provider event names no customer.
pub const UNKNOWN_CUSTOMER: &str = "unknown";

/// Errors raised while assembling a [`NormalizedTransaction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("Amount '{field}' must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Canonical transaction handed to risk scoring and billing.
///
/// Built once through [`NormalizedTransactionBuilder`] and never mutated.
/// Downstream consumers only see this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    transaction_id: String,
    provider: String,
    customer_id: String,
    customer_email: Option<String>,
    source_currency: String,
    source_amount: Decimal,
    destination_currency: String,
    destination_amount: Decimal,
    source_country: String,
    destination_country: String,
    status: TransactionStatus,
    created_at: Timestamp,
    completed_at: Option<Timestamp>,
    description: Option<String>,
    metadata: BTreeMap<String, serde_json::Value>,
}

impl NormalizedTransaction {
    /// Starts a builder for the given provider.
    ///
    /// `received_at` stands in for `created_at` when the provider supplies no
    /// usable timestamp, so building never reads the clock.
    pub fn builder(provider: impl Into<String>, received_at: Timestamp) -> NormalizedTransactionBuilder {
        NormalizedTransactionBuilder::new(provider, received_at)
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer_email.as_deref()
    }

    pub fn source_currency(&self) -> &str {
        &self.source_currency
    }

    pub fn source_amount(&self) -> Decimal {
        self.source_amount
    }

    pub fn destination_currency(&self) -> &str {
        &self.destination_currency
    }

    pub fn destination_amount(&self) -> Decimal {
        self.destination_amount
    }

    pub fn source_country(&self) -> &str {
        &self.source_country
    }

    pub fn destination_country(&self) -> &str {
        &self.destination_country
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Convenience accessor for string metadata values.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// Accumulates provider fields and enforces the canonical invariants on
/// [`build`](NormalizedTransactionBuilder::build).
#[derive(Debug, Clone)]
pub struct NormalizedTransactionBuilder {
    provider: String,
    transaction_id: Option<String>,
    customer_id: Option<String>,
    customer_email: Option<String>,
    source_currency: Option<String>,
    source_amount: Option<Decimal>,
    destination_currency: Option<String>,
    destination_amount: Option<Decimal>,
    source_country: Option<String>,
    destination_country: Option<String>,
    status: TransactionStatus,
    created_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    received_at: Timestamp,
    description: Option<String>,
    metadata: BTreeMap<String, serde_json::Value>,
}

impl NormalizedTransactionBuilder {
    fn new(provider: impl Into<String>, received_at: Timestamp) -> Self {
        Self {
            provider: provider.into(),
            transaction_id: None,
            customer_id: None,
            customer_email: None,
            source_currency: None,
            source_amount: None,
            destination_currency: None,
            destination_amount: None,
            source_country: None,
            destination_country: None,
            status: TransactionStatus::Pending,
            created_at: None,
            completed_at: None,
            received_at,
            description: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Picks the first non-empty candidate as the transaction id.
    pub fn transaction_id_from<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.transaction_id = candidates
            .into_iter()
            .flatten()
            .map(|id| {
                let id: String = id.into();
                id.trim().to_string()
            })
            .find(|id| !id.is_empty());
        self
    }

    pub fn customer_id(mut self, id: Option<String>) -> Self {
        self.customer_id = non_empty(id);
        self
    }

    pub fn customer_email(mut self, email: Option<String>) -> Self {
        self.customer_email = non_empty(email);
        self
    }

    pub fn source(mut self, currency: Option<String>, amount: Option<Decimal>) -> Self {
        self.source_currency = non_empty(currency);
        self.source_amount = amount;
        self
    }

    pub fn destination(mut self, currency: Option<String>, amount: Option<Decimal>) -> Self {
        self.destination_currency = non_empty(currency);
        self.destination_amount = amount;
        self
    }

    pub fn source_country(mut self, country: Option<String>) -> Self {
        self.source_country = country;
        self
    }

    pub fn destination_country(mut self, country: Option<String>) -> Self {
        self.destination_country = country;
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn created_at(mut self, at: Option<Timestamp>) -> Self {
        self.created_at = at;
        self
    }

    pub fn completed_at(mut self, at: Option<Timestamp>) -> Self {
        self.completed_at = at;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    /// Adds a metadata entry. Null values are skipped.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.metadata.insert(key.into(), value);
        }
        self
    }

    /// Validates and assembles the transaction.
    ///
    /// # Errors
    ///
    /// - `MissingField` when neither currency is known
    /// - `NegativeAmount` when either amount is below zero
    pub fn build(self) -> Result<NormalizedTransaction, TransactionError> {
        let destination_currency = self
            .destination_currency
            .as_deref()
            .map(normalize_currency)
            .ok_or(TransactionError::MissingField("destination_currency"))?;
        let source_currency = self
            .source_currency
            .as_deref()
            .map(normalize_currency)
            .unwrap_or_else(|| destination_currency.clone());

        let source_amount = checked_amount("source_amount", self.source_amount, &source_currency)?;
        let destination_amount = checked_amount(
            "destination_amount",
            self.destination_amount,
            &destination_currency,
        )?;

        let source_country = resolve_country(self.source_country, &source_currency);
        let destination_country = resolve_country(self.destination_country, &destination_currency);

        let created_at = self.created_at.unwrap_or(self.received_at);
        let completed_at = match self.status {
            TransactionStatus::Completed => Some(self.completed_at.unwrap_or(created_at)),
            _ => None,
        };

        let mut metadata = self.metadata;
        metadata.insert(
            "provider".to_string(),
            serde_json::Value::String(self.provider.clone()),
        );

        Ok(NormalizedTransaction {
            transaction_id: self
                .transaction_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            provider: self.provider,
            customer_id: self
                .customer_id
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            customer_email: self.customer_email,
            source_currency,
            source_amount,
            destination_currency,
            destination_amount,
            source_country,
            destination_country,
            status: self.status,
            created_at,
            completed_at,
            description: self.description,
            metadata,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn checked_amount(
    field: &'static str,
    amount: Option<Decimal>,
    currency: &str,
) -> Result<Decimal, TransactionError> {
    let value = amount.unwrap_or(Decimal::ZERO);
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TransactionError::NegativeAmount { field, value });
    }
    Ok(round_to_minor_units(value, currency))
}

/// Uses the supplied country when it looks like an alpha-2 code, otherwise
/// infers it from the currency.
fn resolve_country(country: Option<String>, currency: &str) -> String {
    country
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| c.len() == 2 && c.chars().all(|ch| ch.is_ascii_alphabetic()))
        .unwrap_or_else(|| country_for_currency(currency).to_string())
}
