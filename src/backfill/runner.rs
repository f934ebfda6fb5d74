//! # Backfill Runner
//!
//! The run loop tying the stages together: read the checkpoint once at
//! start, then for each chunk of ids enrich, publish every snapshot, and
//! only then advance the checkpoint to the chunk's highest id.
//!
//! A crash between publishing and checkpointing means the whole chunk is
//! republished on restart; delivery is at-least-once by design.

use sqlx::PgPool;
use tracing::{info, instrument};

use super::pager::GroupIdPager;
use super::snapshot;
use super::CHUNK_SIZE;
use crate::checkpoint::CheckpointStore;
use crate::error::Result;
use crate::messaging::SnapshotSink;
use crate::models::Group;

/// Outcome of a completed run, for operator logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Checkpoint value the run started from (0 for a fresh run)
    pub starting_id: i64,
    pub chunks_processed: u64,
    pub snapshots_published: u64,
    /// Last id written to the checkpoint store
    pub last_checkpointed_id: i64,
}

/// Sequential backfill job over the full group table
pub struct BackfillRunner<C, S> {
    pool: PgPool,
    checkpoint: C,
    sink: S,
    chunk_size: i64,
}

impl<C: CheckpointStore, S: SnapshotSink> BackfillRunner<C, S> {
    pub fn new(pool: PgPool, checkpoint: C, sink: S) -> Self {
        Self {
            pool,
            checkpoint,
            sink,
            chunk_size: CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: i64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Run the backfill to completion, resuming after any saved checkpoint.
    #[instrument(skip(self), fields(provider = self.checkpoint.provider_name()))]
    pub async fn run(&self) -> Result<BackfillSummary> {
        let starting_id = self.checkpoint.load().await?;
        let approximate_total = Group::approximate_count(&self.pool).await?;

        info!(
            starting_id = starting_id,
            approximate_total = approximate_total,
            chunk_size = self.chunk_size,
            "Starting group attributes backfill"
        );

        let mut summary = BackfillSummary {
            starting_id,
            chunks_processed: 0,
            snapshots_published: 0,
            last_checkpointed_id: starting_id,
        };

        let mut pager = GroupIdPager::new(self.chunk_size, starting_id);

        while let Some(group_ids) = pager.next_chunk(&self.pool).await? {
            let snapshots = snapshot::load_snapshots(&self.pool, &group_ids).await?;

            for snap in &snapshots {
                self.sink.publish(snap).await?;
            }

            if let Some(max_id) = chunk_checkpoint(&group_ids) {
                self.checkpoint.save(max_id).await?;
                summary.last_checkpointed_id = max_id;
            }

            summary.chunks_processed += 1;
            summary.snapshots_published += snapshots.len() as u64;

            info!(
                chunk = summary.chunks_processed,
                rows = group_ids.len(),
                last_id = summary.last_checkpointed_id,
                progress_pct = progress_pct(summary.snapshots_published, approximate_total),
                "Chunk published and checkpointed"
            );
        }

        info!(
            chunks = summary.chunks_processed,
            snapshots = summary.snapshots_published,
            last_id = summary.last_checkpointed_id,
            "Backfill complete"
        );

        Ok(summary)
    }
}

/// Checkpoint value for a chunk: its highest id, independent of order
fn chunk_checkpoint(group_ids: &[i64]) -> Option<i64> {
    group_ids.iter().copied().max()
}

/// Rough completion percentage against the planner's row estimate
fn progress_pct(published: u64, approximate_total: i64) -> f64 {
    if approximate_total <= 0 {
        return 0.0;
    }
    (published as f64 / approximate_total as f64 * 100.0).min(100.0)
}
