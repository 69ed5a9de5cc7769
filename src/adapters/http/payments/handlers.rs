//! HTTP handlers for webhook, rate and provider endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use rust_decimal::Decimal;

use crate::adapters::providers::ProviderRegistry;
use crate::application::{
    GetProviderHealthHandler, GetProviderHealthQuery, ProcessWebhookCommand,
    ProcessWebhookHandler, QuoteService, WebhookError,
};
use crate::domain::foundation::{normalize_currency, Timestamp};
use crate::ports::{ProviderError, RateCache, TransactionSink};

use super::dto::{
    BestQuoteQuery, BestQuoteResponse, ErrorResponse, ProvidersResponse, RateQuery, RateResponse,
};

/// Header naming the preferred provider on `POST /api/webhooks`.
pub const PROVIDER_HINT_HEADER: &str = "X-Payment-Provider";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; everything inside is Arc-wrapped.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub registry: Arc<ProviderRegistry>,
    pub webhooks: Arc<ProcessWebhookHandler>,
    pub quotes: Arc<QuoteService>,
}

impl PaymentsAppState {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        cache: Arc<dyn RateCache>,
        sink: Arc<dyn TransactionSink>,
    ) -> Self {
        Self {
            webhooks: Arc::new(ProcessWebhookHandler::new(registry.clone(), sink)),
            quotes: Arc::new(QuoteService::new(registry.clone(), cache)),
            registry,
        }
    }

    pub fn provider_health_handler(&self) -> GetProviderHealthHandler {
        GetProviderHealthHandler::new(self.registry.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/:provider - Webhook addressed to a named provider
pub async fn receive_provider_webhook(
    State(state): State<PaymentsAppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let cmd = ProcessWebhookCommand {
        provider_hint: None,
        route_provider: Some(provider),
        payload: body.to_vec(),
        headers: header_pairs(&headers),
        received_at: Timestamp::now(),
    };

    let transaction = state.webhooks.handle(cmd).await?;
    Ok(Json(transaction))
}

/// POST /api/webhooks - Webhook routed by the `X-Payment-Provider` hint
pub async fn receive_webhook(
    State(state): State<PaymentsAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let cmd = ProcessWebhookCommand {
        provider_hint: header_value(&headers, PROVIDER_HINT_HEADER),
        route_provider: None,
        payload: body.to_vec(),
        headers: header_pairs(&headers),
        received_at: Timestamp::now(),
    };

    let transaction = state.webhooks.handle(cmd).await?;
    Ok(Json(transaction))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/rates - Rate from one provider
pub async fn get_rate(
    State(state): State<PaymentsAppState>,
    Query(query): Query<RateQuery>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let amount = checked_amount(query.amount)?;
    let (provider, rate) = state
        .quotes
        .provider_rate(query.provider.as_deref(), &query.from, &query.to, amount)
        .await?;

    Ok(Json(RateResponse {
        provider: provider.to_string(),
        from: normalize_currency(&query.from),
        to: normalize_currency(&query.to),
        rate,
        available: rate > Decimal::ZERO,
    }))
}

/// GET /api/rates/best - Best rate across all providers
pub async fn get_best_quote(
    State(state): State<PaymentsAppState>,
    Query(query): Query<BestQuoteQuery>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let amount = checked_amount(query.amount)?;
    let quote = state
        .quotes
        .best_quote(&query.from, &query.to, amount)
        .await
        .ok_or_else(|| PaymentsApiError::RateUnavailable {
            from: normalize_currency(&query.from),
            to: normalize_currency(&query.to),
        })?;

    Ok(Json(BestQuoteResponse::from(quote)))
}

/// GET /api/providers - Registered providers
pub async fn list_providers(State(state): State<PaymentsAppState>) -> impl IntoResponse {
    let providers = state
        .provider_health_handler()
        .handle(GetProviderHealthQuery);
    Json(ProvidersResponse { providers })
}

/// Amount to convert; one unit when omitted. Negative amounts are rejected.
fn checked_amount(amount: Option<Decimal>) -> Result<Decimal, PaymentsApiError> {
    match amount {
        None => Ok(Decimal::ONE),
        Some(amount) if amount < Decimal::ZERO => {
            Err(PaymentsApiError::InvalidAmount(amount))
        }
        Some(amount) => Ok(amount),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Header names from `HeaderMap` are already lower-case. Non-ASCII values are
/// skipped.
fn header_pairs(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum PaymentsApiError {
    Webhook(WebhookError),
    RateUnavailable { from: String, to: String },
    InvalidAmount(Decimal),
}

impl From<WebhookError> for PaymentsApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl From<ProviderError> for PaymentsApiError {
    fn from(err: ProviderError) -> Self {
        Self::Webhook(WebhookError::Provider(err))
    }
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self {
            PaymentsApiError::Webhook(err) => match err {
                WebhookError::Provider(ProviderError::InvalidWebhookPayload(_)) => {
                    (StatusCode::BAD_REQUEST, "INVALID_WEBHOOK_PAYLOAD")
                }
                WebhookError::Provider(ProviderError::UnknownProvider(_)) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_PROVIDER")
                }
                WebhookError::Provider(ProviderError::NoProviderAvailable) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "NO_PROVIDER_AVAILABLE")
                }
                WebhookError::Provider(ProviderError::UpstreamUnavailable(_)) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE")
                }
                WebhookError::Provider(ProviderError::HttpClient(_)) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
                WebhookError::MissingSignature { .. } => {
                    (StatusCode::UNAUTHORIZED, "MISSING_WEBHOOK_SIGNATURE")
                }
                WebhookError::SignatureVerificationFailed { .. } => {
                    (StatusCode::UNAUTHORIZED, "INVALID_WEBHOOK_SIGNATURE")
                }
                WebhookError::Downstream(_) => (StatusCode::BAD_GATEWAY, "DOWNSTREAM_FAILURE"),
            },
            PaymentsApiError::RateUnavailable { .. } => (StatusCode::NOT_FOUND, "RATE_UNAVAILABLE"),
            PaymentsApiError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
        };

        let body = match self {
            PaymentsApiError::Webhook(err) => ErrorResponse::new(error_code, err.to_string()),
            PaymentsApiError::RateUnavailable { from, to } => ErrorResponse::with_details(
                error_code,
                "No provider offered a rate",
                serde_json::json!({ "from": from, "to": to }),
            ),
            PaymentsApiError::InvalidAmount(amount) => ErrorResponse::with_details(
                error_code,
                "Amount must not be negative",
                serde_json::json!({ "amount": amount }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
