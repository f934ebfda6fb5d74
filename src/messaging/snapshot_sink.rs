//! # Snapshot Sink
//!
//! Publishing seam for assembled snapshots. The production implementation
//! pushes to a pgmq queue; tests substitute their own recording sinks.

use pgmq::PGMQueue;
use tracing::{debug, info};

use crate::backfill::snapshot::GroupAttributesSnapshot;
use crate::error::{BackfillError, Result};

/// Trait defining snapshot publication
///
/// Publish failures propagate to the caller; there is no internal retry, and
/// a failed publish halts the run mid-chunk.
pub trait SnapshotSink: Send + Sync {
    /// Publish one snapshot, returning the sink's message id
    fn publish(
        &self,
        snapshot: &GroupAttributesSnapshot,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;
}

/// pgmq-backed snapshot sink
#[derive(Debug, Clone)]
pub struct PgmqSnapshotSink {
    queue: PGMQueue,
    queue_name: String,
}

impl PgmqSnapshotSink {
    /// Connect to pgmq and ensure the target queue exists
    pub async fn connect(database_url: &str, queue_name: &str) -> Result<Self> {
        let queue = PGMQueue::new(database_url.to_string())
            .await
            .map_err(|e| BackfillError::Publish {
                queue_name: queue_name.to_string(),
                message: format!("Failed to connect to pgmq: {e}"),
            })?;

        queue
            .create(queue_name)
            .await
            .map_err(|e| BackfillError::Publish {
                queue_name: queue_name.to_string(),
                message: format!("Failed to create queue: {e}"),
            })?;

        info!(queue_name = queue_name, "Connected to pgmq");

        Ok(Self {
            queue,
            queue_name: queue_name.to_string(),
        })
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }
}

impl SnapshotSink for PgmqSnapshotSink {
    async fn publish(&self, snapshot: &GroupAttributesSnapshot) -> Result<i64> {
        let message_id = self
            .queue
            .send(&self.queue_name, snapshot)
            .await
            .map_err(|e| BackfillError::Publish {
                queue_name: self.queue_name.clone(),
                message: e.to_string(),
            })?;

        debug!(
            group_id = snapshot.group_id,
            message_id = message_id,
            "Snapshot published"
        );
        Ok(message_id)
    }
}
