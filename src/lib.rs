#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections

//! # Group Attributes Backfill
//!
//! Resumable one-shot job that republishes a derived attribute snapshot for
//! every group in the primary store, so a downstream analytics system can be
//! populated with data that predates the pipeline that normally keeps it in
//! sync.
//!
//! ## How it works
//!
//! The job walks the group table's primary keys in ascending chunks, bulk
//! loads the related assignee and ownership rows for each chunk, assembles
//! one flat snapshot per group, publishes each snapshot to a pgmq queue, and
//! records the chunk's highest id in a Redis checkpoint. A restarted run
//! reads the checkpoint and resumes strictly after it.
//!
//! Delivery is at-least-once: the checkpoint only advances after a chunk is
//! fully published, so a crash mid-chunk republishes that chunk on restart.
//!
//! ## Module Organization
//!
//! - [`models`] - Read-only source rows and their bulk fetches
//! - [`backfill`] - Pagination, snapshot assembly, and the run loop
//! - [`checkpoint`] - Durable cursor persistence (Redis, in-memory)
//! - [`messaging`] - Snapshot publication to pgmq
//! - [`config`] - Environment-backed configuration
//! - [`error`] - Structured error handling

pub mod backfill;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod messaging;
pub mod models;

pub use backfill::{BackfillRunner, BackfillSummary, GroupAttributesSnapshot, GroupIdPager, CHUNK_SIZE};
pub use checkpoint::{
    CheckpointError, CheckpointStore, InMemoryCheckpointStore, RedisCheckpointStore,
    CHECKPOINT_KEY, CHECKPOINT_TTL,
};
pub use config::BackfillConfig;
pub use error::{BackfillError, Result};
pub use messaging::{PgmqSnapshotSink, SnapshotSink};
pub use models::{Group, GroupAssignee, GroupOwner, OwnerKind};
