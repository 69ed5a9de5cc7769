//! Hand-off port for canonical transactions.
//!
//! Risk scoring, billing and persistence live behind this port. The webhook
//! pipeline hands each verified `NormalizedTransaction` to the sink by value.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transaction::NormalizedTransaction;

/// Port for the downstream consumer of canonical transactions.
#[async_trait]
pub trait TransactionSink: Send + Sync {
    /// Take ownership of a verified, normalized transaction.
    async fn accept(&self, transaction: NormalizedTransaction) -> Result<(), SinkError>;
}

/// Downstream refusal or failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transaction sink rejected {transaction_id}: {message}")]
pub struct SinkError {
    pub transaction_id: String,
    pub message: String,
}

impl SinkError {
    pub fn new(transaction_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            message: message.into(),
        }
    }
}
