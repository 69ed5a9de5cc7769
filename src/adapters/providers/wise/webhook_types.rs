//! Wise-specific types for webhook handling and rate lookups.
//!
//! These types mirror Wise JSON as it arrives. Every field except the
//! `data` / `resource` blocks is optional so that schema drift on Wise's
//! side degrades to defaults instead of rejections.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::adapters::providers::json::{lenient_decimal, lenient_string};

// ════════════════════════════════════════════════════════════════════════════════
// Event Sniffing
// ════════════════════════════════════════════════════════════════════════════════

/// Only the `event_type` field, used to pick an envelope before full parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct WiseEventHeader {
    #[serde(default)]
    pub event_type: Option<String>,
}

/// Envelope family chosen from the sniffed event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiseEventKind {
    /// `transfers#state-change` and other `transfers#*` events.
    Transfer,
    /// `balances#credit`: money landed on a balance account.
    BalanceCredit,
}

impl WiseEventKind {
    /// Unrecognized event types are parsed as transfers.
    pub fn sniff(event_type: &str) -> Self {
        match event_type.trim().to_ascii_lowercase().as_str() {
            "balances#credit" => WiseEventKind::BalanceCredit,
            _ => WiseEventKind::Transfer,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Envelopes
// ════════════════════════════════════════════════════════════════════════════════

/// Transfer event envelope (`transfers#state-change`).
#[derive(Debug, Clone, Deserialize)]
pub struct WiseTransferEvent {
    #[serde(default)]
    pub event_type: String,

    pub schema_version: Option<String>,

    pub subscription_id: Option<String>,

    /// When Wise dispatched the webhook.
    pub sent_at: Option<String>,

    /// Mandatory; `None` means the payload is malformed.
    pub data: Option<WiseTransferData>,
}

/// Event-level fields of a transfer event.
#[derive(Debug, Clone, Deserialize)]
pub struct WiseTransferData {
    /// Mandatory nested resource.
    pub resource: Option<WiseResource>,

    pub current_state: Option<String>,

    pub previous_state: Option<String>,

    pub occurred_at: Option<String>,

    pub reference: Option<String>,

    pub source_currency: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub source_amount: Option<Decimal>,

    pub target_currency: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub target_amount: Option<Decimal>,
}

/// Balance credit envelope (`balances#credit`).
#[derive(Debug, Clone, Deserialize)]
pub struct WiseBalanceCreditEvent {
    #[serde(default)]
    pub event_type: String,

    pub schema_version: Option<String>,

    pub subscription_id: Option<String>,

    pub sent_at: Option<String>,

    pub data: Option<WiseBalanceCreditData>,
}

/// Event-level fields of a balance credit.
#[derive(Debug, Clone, Deserialize)]
pub struct WiseBalanceCreditData {
    pub resource: Option<WiseResource>,

    /// Always `credit` for this event family.
    pub transaction_type: Option<String>,

    pub reference: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,

    pub currency: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub post_transaction_balance_amount: Option<Decimal>,

    pub occurred_at: Option<String>,

    pub channel_name: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Resource
// ════════════════════════════════════════════════════════════════════════════════

/// The Wise object an event is about (transfer or balance account).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WiseResource {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub profile_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub account_id: Option<String>,

    #[serde(rename = "type")]
    pub resource_type: Option<String>,

    pub reference: Option<String>,

    pub source_currency: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub source_amount: Option<Decimal>,

    pub target_currency: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub target_amount: Option<Decimal>,

    /// Resource creation time.
    pub created: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Rates
// ════════════════════════════════════════════════════════════════════════════════

/// One element of the `GET /v1/rates` response array.
#[derive(Debug, Clone, Deserialize)]
pub struct WiseRate {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rate: Option<Decimal>,

    pub source: Option<String>,

    pub target: Option<String>,

    pub time: Option<String>,
}
