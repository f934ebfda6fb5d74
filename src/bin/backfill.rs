//! Backfill Binary
//!
//! One-shot maintenance entrypoint: connects to Postgres, Redis, and pgmq,
//! then runs the backfill to completion. Takes no arguments; configuration
//! comes from the environment. Exits non-zero on the first error, leaving
//! the checkpoint at the last fully published chunk.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use group_attributes_backfill::{
    BackfillConfig, BackfillRunner, PgmqSnapshotSink, RedisCheckpointStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("info,group_attributes_backfill=debug")
        .init();

    info!("Starting group attributes backfill");

    let config = BackfillConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    let checkpoint = RedisCheckpointStore::connect(&config.redis_url)
        .await
        .context("Failed to connect to the checkpoint store")?;

    let sink = PgmqSnapshotSink::connect(&config.database_url, &config.queue_name)
        .await
        .context("Failed to connect to the snapshot queue")?;

    let runner = BackfillRunner::new(pool, checkpoint, sink).with_chunk_size(config.chunk_size);

    let summary = runner.run().await?;

    info!(
        starting_id = summary.starting_id,
        chunks = summary.chunks_processed,
        snapshots = summary.snapshots_published,
        last_id = summary.last_checkpointed_id,
        "Backfill finished"
    );

    Ok(())
}
