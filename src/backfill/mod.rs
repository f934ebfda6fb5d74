//! # Backfill Module
//!
//! The three stages of the job: keyset pagination over group ids, bulk
//! enrichment into snapshots, and the run loop that publishes each chunk and
//! advances the checkpoint behind it.

pub mod pager;
pub mod runner;
pub mod snapshot;

pub use pager::GroupIdPager;
pub use runner::{BackfillRunner, BackfillSummary};
pub use snapshot::GroupAttributesSnapshot;

/// Number of group ids fetched, enriched, and checkpointed per chunk
pub const CHUNK_SIZE: i64 = 10_000;
