//! Flutterwave-specific types for webhook handling and rate lookups.
//!
//! Flutterwave wraps every webhook in the same `{event, event.type, data}`
//! envelope; only the shape of `data` differs between charges and transfers.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::providers::json::{lenient_decimal, lenient_string};

// ════════════════════════════════════════════════════════════════════════════════
// Event Sniffing
// ════════════════════════════════════════════════════════════════════════════════

/// Only the `event` field, used to pick the `data` shape.
#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveEventHeader {
    #[serde(default)]
    pub event: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlutterwaveEventKind {
    /// `charge.completed` and other `charge.*` events.
    Charge,
    /// `transfer.completed` and anything unrecognized.
    Transfer,
}

impl FlutterwaveEventKind {
    pub fn sniff(event: &str) -> Self {
        if event.trim().to_ascii_lowercase().starts_with("charge.") {
            FlutterwaveEventKind::Charge
        } else {
            FlutterwaveEventKind::Transfer
        }
    }
}

/// Common webhook envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveEnvelope<T> {
    #[serde(default)]
    pub event: Option<String>,

    /// Coarse category such as `CARD_TRANSACTION` or `Transfer`.
    #[serde(rename = "event.type", default)]
    pub event_category: Option<String>,

    /// Mandatory; `None` means the payload is malformed.
    pub data: Option<T>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Charges
// ════════════════════════════════════════════════════════════════════════════════

/// `data` block of a `charge.*` event.
#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveChargeData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    pub tx_ref: Option<String>,

    pub flw_ref: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,

    /// Amount actually debited from the customer, fees included.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub charged_amount: Option<Decimal>,

    pub currency: Option<String>,

    pub status: Option<String>,

    pub processor_response: Option<String>,

    pub payment_type: Option<String>,

    pub narration: Option<String>,

    pub created_at: Option<String>,

    pub customer: Option<FlutterwaveCustomer>,

    pub card: Option<FlutterwaveCard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlutterwaveCustomer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    pub name: Option<String>,

    pub email: Option<String>,

    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlutterwaveCard {
    pub first_6digits: Option<String>,

    pub last_4digits: Option<String>,

    pub issuer: Option<String>,

    /// Issuing country, either `NG` or `NIGERIA NG`.
    pub country: Option<String>,

    #[serde(rename = "type")]
    pub card_type: Option<String>,
}

impl FlutterwaveCard {
    /// Alpha-2 code from the card's country field, if it carries one.
    pub fn country_code(&self) -> Option<String> {
        let last = self.country.as_deref()?.split_whitespace().last()?;
        if last.len() == 2 && last.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(last.to_ascii_uppercase())
        } else {
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Transfers
// ════════════════════════════════════════════════════════════════════════════════

/// `data` block of a `transfer.*` event.
#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveTransferData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    pub reference: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub fee: Option<Decimal>,

    /// Currency the beneficiary receives.
    pub currency: Option<String>,

    /// Currency debited from the merchant balance.
    pub debit_currency: Option<String>,

    pub status: Option<String>,

    pub complete_message: Option<String>,

    pub narration: Option<String>,

    pub fullname: Option<String>,

    pub bank_name: Option<String>,

    pub created_at: Option<String>,

    /// Free-form; sometimes carries currency hints.
    pub meta: Option<Value>,
}

impl FlutterwaveTransferData {
    /// String value from `meta`, when `meta` is an object.
    pub fn meta_str(&self, key: &str) -> Option<String> {
        self.meta
            .as_ref()?
            .get(key)?
            .as_str()
            .map(str::to_string)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Rates
// ════════════════════════════════════════════════════════════════════════════════

/// `GET /v3/transfers/rates` response.
#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveRateResponse {
    pub status: Option<String>,

    pub message: Option<String>,

    pub data: Option<FlutterwaveRateData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveRateData {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rate: Option<Decimal>,
}
