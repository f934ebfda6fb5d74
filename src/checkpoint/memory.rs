//! In-memory checkpoint provider for tests and dry runs.
//!
//! Holds the cursor in process memory; nothing survives a restart, so a run
//! backed by this store always begins at the start of the table.

use parking_lot::Mutex;
use std::sync::Arc;

use super::{CheckpointResult, CheckpointStore};

/// Process-local checkpoint store
#[derive(Debug, Clone, Default)]
pub struct InMemoryCheckpointStore {
    value: Arc<Mutex<Option<i64>>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for InMemoryCheckpointStore {
    async fn load(&self) -> CheckpointResult<i64> {
        Ok((*self.value.lock()).unwrap_or(0))
    }

    async fn save(&self, group_id: i64) -> CheckpointResult<()> {
        *self.value.lock() = Some(group_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
