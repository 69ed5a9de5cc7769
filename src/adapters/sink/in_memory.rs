//! In-memory transaction sink for testing.
//!
//! Captures accepted transactions for assertions and can be switched into a
//! failing mode to exercise downstream errors.
//!
//! # Panics
//!
//! Methods panic if the internal lock is poisoned. This adapter is for
//! tests and local runs only.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::transaction::NormalizedTransaction;
use crate::ports::{SinkError, TransactionSink};

/// Collecting sink.
///
/// # Example
///
/// ```ignore
/// let sink = Arc::new(InMemoryTransactionSink::new());
/// handler.handle(cmd).await?;
/// assert_eq!(sink.count(), 1);
/// ```
#[derive(Default)]
pub struct InMemoryTransactionSink {
    accepted: RwLock<Vec<NormalizedTransaction>>,
    failure: Option<String>,
}

impl InMemoryTransactionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every transaction with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            accepted: RwLock::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    // === Test Helpers ===

    pub fn transactions(&self) -> Vec<NormalizedTransaction> {
        self.accepted
            .read()
            .expect("InMemoryTransactionSink: lock poisoned")
            .clone()
    }

    pub fn count(&self) -> usize {
        self.accepted
            .read()
            .expect("InMemoryTransactionSink: lock poisoned")
            .len()
    }

    pub fn find(&self, transaction_id: &str) -> Option<NormalizedTransaction> {
        self.transactions()
            .into_iter()
            .find(|t| t.transaction_id() == transaction_id)
    }
}

#[async_trait]
impl TransactionSink for InMemoryTransactionSink {
    async fn accept(&self, transaction: NormalizedTransaction) -> Result<(), SinkError> {
        if let Some(message) = &self.failure {
            return Err(SinkError::new(transaction.transaction_id(), message.clone()));
        }

        self.accepted
            .write()
            .expect("InMemoryTransactionSink: lock poisoned")
            .push(transaction);
        Ok(())
    }
}
