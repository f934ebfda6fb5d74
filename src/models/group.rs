//! # Group Model
//!
//! The primary record being backfilled. Each row in `issue_groups` produces
//! exactly one published snapshot.
//!
//! ## Database Schema
//!
//! Maps to the `issue_groups` table with the following key columns:
//! - `id`: Primary key (BIGINT)
//! - `project_id`: Owning project (BIGINT)
//! - `status` / `substatus`: Lifecycle state (INTEGER, substatus nullable)
//! - `first_seen`: First occurrence timestamp (TIMESTAMP)
//! - `num_comments`: Comment counter (INTEGER, nullable)
//! - `priority`: Triage priority (INTEGER, nullable)
//! - `first_release_id`: First release the group appeared in (BIGINT, nullable)

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::error;

use crate::error::{BackfillError, Result};

/// A group row with default-value rules already applied.
///
/// `num_comments` is coalesced to 0 and a zero `first_release_id` is
/// normalized to `None`, so downstream snapshot assembly never needs to
/// re-apply those rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub project_id: i64,
    pub status: i32,
    pub substatus: Option<i32>,
    pub first_seen: NaiveDateTime,
    pub num_comments: i32,
    pub priority: Option<i32>,
    pub first_release_id: Option<i64>,
}

/// Raw row shape as stored, before default-value rules
#[derive(Debug, Clone, FromRow)]
struct GroupRow {
    id: i64,
    project_id: i64,
    status: i32,
    substatus: Option<i32>,
    first_seen: NaiveDateTime,
    num_comments: Option<i32>,
    priority: Option<i32>,
    first_release_id: Option<i64>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            project_id: row.project_id,
            status: row.status,
            substatus: row.substatus,
            first_seen: row.first_seen,
            num_comments: row.num_comments.unwrap_or(0),
            priority: row.priority,
            first_release_id: row.first_release_id.filter(|id| *id != 0),
        }
    }
}

impl Group {
    /// Fetch groups for exactly the requested ids, in request order.
    ///
    /// Fails with [`BackfillError::MissingGroups`] if any requested id has no
    /// matching row; a missing row means the source tables are referentially
    /// inconsistent and the run must abort rather than skip.
    pub async fn fetch_by_ids(pool: &PgPool, group_ids: &[i64]) -> Result<Vec<Group>> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"
            SELECT id, project_id, status, substatus, first_seen,
                   num_comments, priority, first_release_id
            FROM issue_groups
            WHERE id = ANY($1)
        "#;

        let rows = sqlx::query_as::<_, GroupRow>(query)
            .bind(group_ids)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch groups: {}", e);
                BackfillError::database("group fetch", e)
            })?;

        collect_in_request_order(group_ids, rows)
    }

    /// Planner-statistics row estimate for the groups table.
    ///
    /// Used only for progress reporting; a `COUNT(*)` over the full table
    /// would be far too slow at backfill scale.
    pub async fn approximate_count(pool: &PgPool) -> Result<i64> {
        let query = "SELECT reltuples::BIGINT FROM pg_class WHERE relname = 'issue_groups'";

        let estimate: Option<i64> = sqlx::query_scalar(query)
            .fetch_optional(pool)
            .await
            .map_err(|e| BackfillError::database("group count estimate", e))?;

        Ok(estimate.unwrap_or(0).max(0))
    }
}

/// Order fetched rows by the requested id list, applying default-value rules.
///
/// The result has the same length and order as `group_ids`.
fn collect_in_request_order(group_ids: &[i64], rows: Vec<GroupRow>) -> Result<Vec<Group>> {
    let mut rows_by_id: HashMap<i64, GroupRow> =
        rows.into_iter().map(|row| (row.id, row)).collect();

    let found = rows_by_id.len();
    if found != group_ids.len() {
        return Err(BackfillError::MissingGroups {
            requested: group_ids.len(),
            found,
        });
    }

    let mut groups = Vec::with_capacity(group_ids.len());
    for group_id in group_ids {
        let row = rows_by_id
            .remove(group_id)
            .ok_or(BackfillError::MissingGroups {
                requested: group_ids.len(),
                found,
            })?;
        groups.push(Group::from(row));
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64) -> GroupRow {
        GroupRow {
            id,
            project_id: 1,
            status: 1,
            substatus: None,
            first_seen: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            num_comments: None,
            priority: None,
            first_release_id: None,
        }
    }

    #[test]
    fn test_rows_returned_in_request_order() {
        let groups =
            collect_in_request_order(&[3, 1, 2], vec![row(1), row(2), row(3)]).unwrap();
        let ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_missing_row_is_fatal() {
        let result = collect_in_request_order(&[1, 2, 3], vec![row(1), row(2)]);
        assert!(matches!(
            result,
            Err(BackfillError::MissingGroups {
                requested: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_default_value_rules() {
        let mut raw = row(5);
        raw.num_comments = None;
        raw.first_release_id = Some(0);
        let group = Group::from(raw);
        assert_eq!(group.num_comments, 0);
        assert_eq!(group.first_release_id, None);

        let mut raw = row(6);
        raw.num_comments = Some(7);
        raw.first_release_id = Some(42);
        let group = Group::from(raw);
        assert_eq!(group.num_comments, 7);
        assert_eq!(group.first_release_id, Some(42));
    }
}
