//! # Messaging Module
//!
//! PostgreSQL message queue (pgmq) publishing for assembled snapshots.
//! One message per snapshot, published synchronously in produced order.

pub mod snapshot_sink;

pub use snapshot_sink::{PgmqSnapshotSink, SnapshotSink};
