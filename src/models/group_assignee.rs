//! # GroupAssignee Model
//!
//! The current assignee for a group, at most one row per group. The assignee
//! is either a user or a team; both columns are nullable and exactly one is
//! set by the application that writes the table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::error;

use crate::error::{BackfillError, Result};

/// Maps to the `issue_group_assignees` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GroupAssignee {
    pub group_id: i64,
    pub user_id: Option<i64>,
    pub team_id: Option<i64>,
}

impl GroupAssignee {
    /// Fetch assignees for a set of group ids, keyed by group id.
    ///
    /// Groups without an assignee are simply absent from the map.
    pub async fn fetch_by_group_ids(
        pool: &PgPool,
        group_ids: &[i64],
    ) -> Result<HashMap<i64, GroupAssignee>> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = r#"
            SELECT group_id, user_id, team_id
            FROM issue_group_assignees
            WHERE group_id = ANY($1)
        "#;

        let rows = sqlx::query_as::<_, GroupAssignee>(query)
            .bind(group_ids)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch group assignees: {}", e);
                BackfillError::database("group assignee fetch", e)
            })?;

        Ok(rows.into_iter().map(|row| (row.group_id, row)).collect())
    }
}
