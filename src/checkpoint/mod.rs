//! # Checkpoint Store
//!
//! Durable cursor persistence for resumable runs. The backfill records the
//! last fully published group id under a single fixed key; a restarted run
//! reads it back and resumes strictly after that id.
//!
//! The value expires after a week so an abandoned backfill does not leave a
//! stale cursor behind forever.

pub mod memory;
pub mod redis;

pub use memory::InMemoryCheckpointStore;
pub use redis::RedisCheckpointStore;

use std::time::Duration;

use thiserror::Error;

/// Fixed key the cursor is stored under
pub const CHECKPOINT_KEY: &str = "backfill_group_attributes";

/// How long a saved cursor stays readable (7 days)
pub const CHECKPOINT_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Errors that can occur against the checkpoint store
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Failed to connect to the backing store
    #[error("Checkpoint connection error: {0}")]
    Connection(String),

    /// The stored value could not be parsed as an id
    #[error("Checkpoint parse error: {0}")]
    Parse(String),

    /// Generic backend error
    #[error("Checkpoint backend error: {0}")]
    Backend(String),
}

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Trait defining checkpoint persistence
///
/// Implemented by concrete providers (Redis, in-memory). All operations are
/// async and return `CheckpointResult` for error handling.
pub trait CheckpointStore: Send + Sync {
    /// Load the saved cursor, or 0 when none has been saved yet
    fn load(&self) -> impl std::future::Future<Output = CheckpointResult<i64>> + Send;

    /// Save the cursor with the fixed expiry
    fn save(&self, group_id: i64) -> impl std::future::Future<Output = CheckpointResult<()>> + Send;

    /// Get the name of the checkpoint provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_constants() {
        assert_eq!(CHECKPOINT_KEY, "backfill_group_attributes");
        assert_eq!(CHECKPOINT_TTL.as_secs(), 604_800);
    }
}
