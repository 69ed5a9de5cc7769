//! Axum router configuration for payment endpoints.
//!
//! This module defines the route structure for webhook, rate and provider
//! endpoints and wires them to their corresponding handlers.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_best_quote, get_rate, list_providers, receive_provider_webhook, receive_webhook,
    PaymentsAppState,
};

/// Create the webhook router.
///
/// Webhooks carry no user authentication; each is verified via the
/// provider's signature header.
///
/// # Routes
/// - `POST /` - Provider chosen by `X-Payment-Provider` hint or priority
/// - `POST /:provider` - Provider named in the path
pub fn webhook_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/", post(receive_webhook))
        .route("/:provider", post(receive_provider_webhook))
}

/// Create the exchange-rate router.
///
/// # Routes
/// - `GET /` - Rate from one provider (`?from=&to=&amount=&provider=`)
/// - `GET /best` - Best rate across providers (`?from=&to=&amount=`)
pub fn rate_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/", get(get_rate))
        .route("/best", get(get_best_quote))
}

/// Create the complete payments router, mounted under `/api`.
///
/// # Example
///
/// ```ignore
/// let app = payments_router().with_state(state);
/// ```
pub fn payments_router() -> Router<PaymentsAppState> {
    Router::new()
        .nest("/api/webhooks", webhook_routes())
        .nest("/api/rates", rate_routes())
        .route("/api/providers", get(list_providers))
}
