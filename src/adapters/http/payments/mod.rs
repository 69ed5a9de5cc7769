//! HTTP adapter for payment endpoints.
//!
//! Exposes the webhook pipeline and rate lookups via REST API:
//! - `POST /api/webhooks/:provider` - Webhook for a named provider
//! - `POST /api/webhooks` - Webhook routed by `X-Payment-Provider` or priority
//! - `GET /api/rates` - Rate from one provider
//! - `GET /api/rates/best` - Best rate across providers
//! - `GET /api/providers` - Registered providers

pub mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::{PaymentsApiError, PaymentsAppState, PROVIDER_HINT_HEADER};
pub use routes::{payments_router, rate_routes, webhook_routes};
