//! Flutterwave payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Flutterwave:
//! - Charge and transfer webhooks
//! - HMAC-SHA256 webhook signature verification (fails open without a secret)
//! - Cached exchange-rate lookups against `/v3/transfers/rates`
//!
//! # Configuration
//!
//! Environment variables (see `config::providers`):
//! - `PAYBRIDGE__PROVIDERS__FLUTTERWAVE__SECRET_KEY`: API secret key
//! - `PAYBRIDGE__PROVIDERS__FLUTTERWAVE__WEBHOOK_SECRET_HASH`: dashboard secret hash

mod adapter;
mod webhook_types;

pub use adapter::{
    FlutterwaveConfig, FlutterwaveProvider, FLUTTERWAVE, FLUTTERWAVE_DEFAULT_BASE_URL,
    FLUTTERWAVE_SIGNATURE_HEADER, FLUTTERWAVE_STATUS,
};
pub use webhook_types::{
    FlutterwaveCard, FlutterwaveChargeData, FlutterwaveCustomer, FlutterwaveEnvelope,
    FlutterwaveEventKind, FlutterwaveTransferData,
};
