//! Wise payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Wise:
//! - Transfer state-change and balance-credit webhooks
//! - RSA-SHA256 webhook signature verification
//! - Cached exchange-rate lookups against `/v1/rates`
//!
//! # Configuration
//!
//! Environment variables (see `config::providers`):
//! - `PAYBRIDGE__PROVIDERS__WISE__API_TOKEN`: API bearer token
//! - `PAYBRIDGE__PROVIDERS__WISE__WEBHOOK_PUBLIC_KEY`: PEM or base64 DER public key

mod adapter;
mod webhook_types;

pub use adapter::{
    WiseConfig, WiseProvider, WISE, WISE_DEFAULT_BASE_URL, WISE_SIGNATURE_HEADER, WISE_STATUS,
};
pub use webhook_types::{
    WiseBalanceCreditData, WiseBalanceCreditEvent, WiseEventKind, WiseRate, WiseResource,
    WiseTransferData, WiseTransferEvent,
};
