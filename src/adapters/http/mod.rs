//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles every endpoint behind a per-request timeout, with
//! optional request tracing.

pub mod payments;

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use payments::{payments_router, PaymentsAppState};

/// Complete application router, ready to serve.
pub fn app_router(state: PaymentsAppState, request_timeout: Duration, trace_requests: bool) -> Router {
    let router = payments_router()
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout));

    if trace_requests {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
