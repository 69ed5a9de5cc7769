//! Canonical transaction status and per-provider status-translation tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a canonical transaction.
///
/// Every provider state is folded into one of these five values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Accepted by the provider but not yet moving.
    #[default]
    Pending,

    /// Funds are in flight.
    Processing,

    /// Funds delivered.
    Completed,

    /// Provider gave up on the transaction.
    Failed,

    /// Withdrawn before completion.
    Cancelled,
}

impl TransactionStatus {
    /// Returns true for statuses that will not change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed | TransactionStatus::Failed | TransactionStatus::Cancelled
        )
    }

    /// All statuses, in lifecycle order.
    pub fn all() -> [TransactionStatus; 5] {
        [
            TransactionStatus::Pending,
            TransactionStatus::Processing,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ]
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Processing => "PROCESSING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Mapping from a provider's raw state strings to canonical statuses.
///
/// Lookups are case-insensitive and ignore surrounding whitespace. Entries
/// must be written in lower case. States missing from the table translate
/// to [`TransactionStatus::Pending`].
#[derive(Debug, Clone, Copy)]
pub struct StatusTable {
    entries: &'static [(&'static str, TransactionStatus)],
    terminal_success: &'static [&'static str],
}

impl StatusTable {
    /// Creates a table from `(raw_state, status)` pairs and the raw states
    /// that mean the money arrived.
    pub const fn new(
        entries: &'static [(&'static str, TransactionStatus)],
        terminal_success: &'static [&'static str],
    ) -> Self {
        Self {
            entries,
            terminal_success,
        }
    }

    /// Translates a raw provider state. Never fails.
    pub fn translate(&self, raw_state: &str) -> TransactionStatus {
        self.lookup(raw_state).unwrap_or(TransactionStatus::Pending)
    }

    /// Returns the mapped status, or `None` if the state is not in the table.
    pub fn lookup(&self, raw_state: &str) -> Option<TransactionStatus> {
        let key = raw_state.trim().to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(state, _)| *state == key)
            .map(|(_, status)| *status)
    }

    /// Whether the raw state is a terminal-success state for this provider.
    pub fn is_terminal_success(&self, raw_state: &str) -> bool {
        let key = raw_state.trim().to_ascii_lowercase();
        self.terminal_success.iter().any(|state| *state == key)
    }

    /// Raw states defined by the table.
    pub fn states(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(state, _)| *state)
    }
}
