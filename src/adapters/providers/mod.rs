//! Payment provider adapters.
//!
//! Implementations of the `PaymentProvider` port plus the registry that
//! selects between them.
//!
//! ## Available Adapters
//!
//! - `WiseProvider` - Primary provider, RSA-signed webhooks
//! - `FlutterwaveProvider` - Secondary provider, HMAC-signed webhooks
//! - `MockPaymentProvider` - Configurable provider for tests

mod flutterwave;
mod json;
mod mock;
mod rate_lookup;
mod registry;
mod signature;
mod wise;

#[cfg(test)]
pub(crate) mod test_support;

pub use flutterwave::{
    FlutterwaveCard, FlutterwaveChargeData, FlutterwaveConfig, FlutterwaveCustomer,
    FlutterwaveEnvelope, FlutterwaveEventKind, FlutterwaveProvider, FlutterwaveTransferData,
    FLUTTERWAVE, FLUTTERWAVE_DEFAULT_BASE_URL, FLUTTERWAVE_SIGNATURE_HEADER, FLUTTERWAVE_STATUS,
};
pub use json::{decimal_from_json, lenient_decimal, lenient_string};
pub use mock::{MethodCall, MockPaymentProvider};
pub use registry::ProviderRegistry;
pub use signature::{
    decode_public_key, hmac_sha256, HmacSha256Verifier, KeyDecodeError, MissingSecretPolicy,
    RsaSha256Verifier,
};
pub use wise::{
    WiseBalanceCreditData, WiseBalanceCreditEvent, WiseConfig, WiseEventKind, WiseProvider,
    WiseRate, WiseResource, WiseTransferData, WiseTransferEvent, WISE, WISE_DEFAULT_BASE_URL,
    WISE_SIGNATURE_HEADER, WISE_STATUS,
};
