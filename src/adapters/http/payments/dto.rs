//! Data Transfer Objects for payment HTTP endpoints.
//!
//! Webhook responses reuse the serialized `NormalizedTransaction` directly;
//! these types cover rate queries, listings and errors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::{AggregatedQuote, ProviderHealth};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string for `GET /api/rates`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateQuery {
    pub from: String,
    pub to: String,
    /// Amount to convert; defaults to one unit.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Provider to ask; the default provider when omitted.
    #[serde(default)]
    pub provider: Option<String>,
}

/// Query string for `GET /api/rates/best`.
#[derive(Debug, Clone, Deserialize)]
pub struct BestQuoteQuery {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Single-provider rate. `available` is false when the provider had no rate.
#[derive(Debug, Clone, Serialize)]
pub struct RateResponse {
    pub provider: String,
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    pub available: bool,
}

/// Best rate across providers.
#[derive(Debug, Clone, Serialize)]
pub struct BestQuoteResponse {
    pub provider: String,
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    pub converted_amount: Decimal,
}

impl From<AggregatedQuote> for BestQuoteResponse {
    fn from(quote: AggregatedQuote) -> Self {
        Self {
            provider: quote.provider,
            from: quote.from,
            to: quote.to,
            rate: quote.rate,
            converted_amount: quote.converted_amount,
        }
    }
}

/// Registered providers.
#[derive(Debug, Clone, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderHealth>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rate_query_parses_optional_fields() {
        let query: RateQuery =
            serde_json::from_str(r#"{"from":"USD","to":"NGN","amount":"25.50"}"#).unwrap();
        assert_eq!(query.amount, Some(dec!(25.50)));
        assert!(query.provider.is_none());
    }

    #[test]
    fn rate_response_serializes_decimal_as_string() {
        let response = RateResponse {
            provider: "wise".to_string(),
            from: "USD".to_string(),
            to: "NGN".to_string(),
            rate: dec!(1520.25),
            available: true,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["rate"], "1520.25");
        assert_eq!(json["available"], true);
    }

    #[test]
    fn error_response_omits_empty_details() {
        let json = serde_json::to_value(ErrorResponse::new("UNKNOWN_PROVIDER", "nope")).unwrap();
        assert_eq!(json["error_code"], "UNKNOWN_PROVIDER");
        assert!(json.get("details").is_none());

        let json = serde_json::to_value(ErrorResponse::with_details(
            "INVALID_WEBHOOK_SIGNATURE",
            "bad",
            serde_json::json!({"provider": "wise"}),
        ))
        .unwrap();
        assert_eq!(json["details"]["provider"], "wise");
    }
}
