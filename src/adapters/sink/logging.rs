//! Tracing-backed transaction sink.
//!
//! Stands in for risk scoring and billing: every accepted transaction is
//! emitted as one structured `info` event and then dropped.

use async_trait::async_trait;

use crate::domain::transaction::NormalizedTransaction;
use crate::ports::{SinkError, TransactionSink};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTransactionSink;

impl LoggingTransactionSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransactionSink for LoggingTransactionSink {
    async fn accept(&self, transaction: NormalizedTransaction) -> Result<(), SinkError> {
        let metadata = serde_json::to_string(transaction.metadata())
            .map_err(|e| SinkError::new(transaction.transaction_id(), e.to_string()))?;

        tracing::info!(
            transaction_id = transaction.transaction_id(),
            provider = transaction.provider(),
            status = %transaction.status(),
            customer_id = transaction.customer_id(),
            source_currency = transaction.source_currency(),
            source_amount = %transaction.source_amount(),
            destination_currency = transaction.destination_currency(),
            destination_amount = %transaction.destination_amount(),
            source_country = transaction.source_country(),
            destination_country = transaction.destination_country(),
            created_at = %transaction.created_at(),
            metadata = %metadata,
            "Transaction accepted"
        );

        Ok(())
    }
}
