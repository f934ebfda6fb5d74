//! # Group Id Pager
//!
//! Forward-only keyset pagination over the group table's primary keys.
//! Each call fetches the next ascending chunk of ids strictly greater than
//! the cursor, so a run restarted from a saved checkpoint re-enters the
//! sequence at exactly the right place without scanning what came before.

use sqlx::PgPool;
use tracing::debug;

use crate::error::{BackfillError, Result};

/// Chunked id pagination after a cursor
#[derive(Debug)]
pub struct GroupIdPager {
    chunk_size: i64,
    cursor: i64,
    done: bool,
}

impl GroupIdPager {
    /// Start paging ids strictly greater than `after_id`
    pub fn new(chunk_size: i64, after_id: i64) -> Self {
        Self {
            chunk_size,
            cursor: after_id,
            done: false,
        }
    }

    /// Fetch the next chunk of ids, or `None` once the table is exhausted.
    ///
    /// Returned chunks are ascending, non-empty, and at most `chunk_size`
    /// long. The cursor advances to the last id of each chunk.
    pub async fn next_chunk(&mut self, pool: &PgPool) -> Result<Option<Vec<i64>>> {
        if self.done {
            return Ok(None);
        }

        let query = r#"
            SELECT id
            FROM issue_groups
            WHERE id > $1
            ORDER BY id ASC
            LIMIT $2
        "#;

        let ids: Vec<i64> = sqlx::query_scalar(query)
            .bind(self.cursor)
            .bind(self.chunk_size)
            .fetch_all(pool)
            .await
            .map_err(|e| BackfillError::database("group id page", e))?;

        match ids.last() {
            Some(&last_id) => {
                debug!(
                    after_id = self.cursor,
                    rows = ids.len(),
                    last_id = last_id,
                    "Fetched id chunk"
                );
                self.cursor = last_id;
                Ok(Some(ids))
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }

    /// Current cursor position (last id handed out, or the starting id)
    pub fn cursor(&self) -> i64 {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_seeded_from_checkpoint() {
        let pager = GroupIdPager::new(10_000, 0);
        assert_eq!(pager.cursor(), 0);

        let resumed = GroupIdPager::new(10_000, 4200);
        assert_eq!(resumed.cursor(), 4200);
    }

    #[test]
    fn test_same_checkpoint_seeds_same_cursor() {
        let first = GroupIdPager::new(100, 999);
        let second = GroupIdPager::new(100, 999);
        assert_eq!(first.cursor(), second.cursor());
    }
}
