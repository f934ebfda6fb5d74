//! # GroupOwner Model
//!
//! Ownership records for a group. A group accumulates many owner rows over
//! time, each tagged with the mechanism that produced it; only the most
//! recent row per (group, kind) is relevant to the published snapshot.
//!
//! The latest-row selection happens server-side with a window rank so the
//! table is scanned once per chunk regardless of how many historical rows
//! each group has.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::{debug, error};

use crate::error::{BackfillError, Result};

/// Mechanism that produced an ownership record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    SuspectCommit,
    OwnershipRule,
    Codeowners,
}

impl OwnerKind {
    /// Decode the stored integer column value
    pub fn from_raw(value: i32) -> Option<OwnerKind> {
        match value {
            0 => Some(OwnerKind::SuspectCommit),
            1 => Some(OwnerKind::OwnershipRule),
            2 => Some(OwnerKind::Codeowners),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            OwnerKind::SuspectCommit => 0,
            OwnerKind::OwnershipRule => 1,
            OwnerKind::Codeowners => 2,
        }
    }
}

/// Maps to the `issue_group_owners` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GroupOwner {
    pub group_id: i64,
    pub kind: i32,
    pub user_id: Option<i64>,
    pub team_id: Option<i64>,
    pub date_added: NaiveDateTime,
}

impl GroupOwner {
    /// Fetch the most recent owner row per (group, kind) for a set of groups.
    ///
    /// Rows are ranked by descending `date_added` within each
    /// (group_id, kind) partition and only rank 1 survives. Ties on identical
    /// timestamps are resolved by whatever order the ranking emits.
    pub async fn fetch_latest_by_group_ids(
        pool: &PgPool,
        group_ids: &[i64],
    ) -> Result<HashMap<(i64, OwnerKind), GroupOwner>> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = r#"
            SELECT group_id, kind, user_id, team_id, date_added
            FROM (
                SELECT group_id, kind, user_id, team_id, date_added,
                       RANK() OVER (
                           PARTITION BY group_id, kind
                           ORDER BY date_added DESC
                       ) AS recency_rank
                FROM issue_group_owners
                WHERE group_id = ANY($1)
            ) ranked
            WHERE recency_rank = 1
        "#;

        let rows = sqlx::query_as::<_, GroupOwner>(query)
            .bind(group_ids)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch group owners: {}", e);
                BackfillError::database("group owner fetch", e)
            })?;

        Ok(latest_owner_map(rows))
    }
}

/// Build the (group_id, kind) lookup map, keeping the newest row per key.
///
/// The window query already returns at most one row per key; duplicates can
/// still appear on exact-timestamp ties, in which case the strictly newer
/// row wins and equal timestamps keep the first row seen. Rows with an
/// unrecognized kind are skipped.
pub fn latest_owner_map(rows: Vec<GroupOwner>) -> HashMap<(i64, OwnerKind), GroupOwner> {
    let mut owners: HashMap<(i64, OwnerKind), GroupOwner> = HashMap::new();

    for row in rows {
        let kind = match OwnerKind::from_raw(row.kind) {
            Some(kind) => kind,
            None => {
                debug!(
                    group_id = row.group_id,
                    kind = row.kind,
                    "Skipping owner row with unrecognized kind"
                );
                continue;
            }
        };

        match owners.entry((row.group_id, kind)) {
            Entry::Vacant(entry) => {
                entry.insert(row);
            }
            Entry::Occupied(mut entry) => {
                if row.date_added > entry.get().date_added {
                    entry.insert(row);
                }
            }
        }
    }

    owners
}
