//! Webhook handlers.
//!
//! ## Commands
//! - Processing provider webhooks (verify, normalize, hand off)

mod process_webhook;

pub use process_webhook::{ProcessWebhookCommand, ProcessWebhookHandler, WebhookError};
