//! # Backfill Error Types
//!
//! Structured error handling for the backfill job using thiserror.
//! Every failure aborts the run; nothing is retried or swallowed here.

use crate::checkpoint::CheckpointError;
use thiserror::Error;

/// Errors that can abort a backfill run
#[derive(Debug, Error)]
pub enum BackfillError {
    /// Database query or connection failure
    #[error("Database error: {operation}: {message}")]
    Database { operation: String, message: String },

    /// A requested group id had no matching row. This signals referential
    /// inconsistency in the source tables and is not recoverable.
    #[error("Referential integrity failure: requested {requested} groups, found {found}")]
    MissingGroups { requested: usize, found: usize },

    /// Failed to publish a snapshot to the queue
    #[error("Publish error: queue {queue_name}: {message}")]
    Publish { queue_name: String, message: String },

    /// Checkpoint store failure
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BackfillError {
    pub(crate) fn database(operation: &str, source: sqlx::Error) -> Self {
        BackfillError::Database {
            operation: operation.to_string(),
            message: source.to_string(),
        }
    }
}

/// Result type for backfill operations
pub type Result<T> = std::result::Result<T, BackfillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_groups_message() {
        let err = BackfillError::MissingGroups {
            requested: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Referential integrity failure: requested 3 groups, found 2"
        );
    }

    #[test]
    fn test_checkpoint_error_conversion() {
        let err: BackfillError = CheckpointError::Backend("boom".to_string()).into();
        assert!(matches!(err, BackfillError::Checkpoint(_)));
    }
}
