//! # Snapshot Assembly
//!
//! Builds the flat snapshot record published for each group: the group's own
//! fields, the current assignee, and the latest owner per ownership kind.
//!
//! The merge step is a pure function over prefetched rows so the mapping
//! rules stay testable without a database.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Group, GroupAssignee, GroupOwner, OwnerKind};

/// The published snapshot record, one per group.
///
/// Field names are the wire schema; absent optional values serialize as
/// JSON null. `group_deleted` is always false for a backfill, deletions are
/// only ever produced by the live pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAttributesSnapshot {
    pub group_deleted: bool,
    pub project_id: i64,
    pub group_id: i64,
    pub status: i32,
    pub substatus: Option<i32>,
    pub priority: Option<i32>,
    pub first_release: Option<i64>,
    pub first_seen: String,
    pub num_comments: i32,
    pub timestamp: String,
    pub assignee_user_id: Option<i64>,
    pub assignee_team_id: Option<i64>,
    pub owner_suspect_commit_user_id: Option<i64>,
    pub owner_ownership_rule_user_id: Option<i64>,
    pub owner_ownership_rule_team_id: Option<i64>,
    pub owner_codeowners_user_id: Option<i64>,
    pub owner_codeowners_team_id: Option<i64>,
}

/// Load and assemble snapshots for a chunk of group ids, in input order.
pub async fn load_snapshots(
    pool: &PgPool,
    group_ids: &[i64],
) -> Result<Vec<GroupAttributesSnapshot>> {
    if group_ids.is_empty() {
        return Ok(Vec::new());
    }

    let groups = Group::fetch_by_ids(pool, group_ids).await?;
    let assignees = GroupAssignee::fetch_by_group_ids(pool, group_ids).await?;
    let owners = GroupOwner::fetch_latest_by_group_ids(pool, group_ids).await?;

    Ok(build_snapshots(&groups, &assignees, &owners, Utc::now()))
}

/// Merge prefetched rows into snapshot records.
///
/// Output length equals input length and preserves input order. Groups with
/// no assignee or owner rows get null for every corresponding field.
pub fn build_snapshots(
    groups: &[Group],
    assignees: &HashMap<i64, GroupAssignee>,
    owners: &HashMap<(i64, OwnerKind), GroupOwner>,
    generated_at: DateTime<Utc>,
) -> Vec<GroupAttributesSnapshot> {
    let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Micros, true);

    groups
        .iter()
        .map(|group| {
            let assignee = assignees.get(&group.id);
            let suspect_commit = owners.get(&(group.id, OwnerKind::SuspectCommit));
            let ownership_rule = owners.get(&(group.id, OwnerKind::OwnershipRule));
            let codeowners = owners.get(&(group.id, OwnerKind::Codeowners));

            GroupAttributesSnapshot {
                group_deleted: false,
                project_id: group.project_id,
                group_id: group.id,
                status: group.status,
                substatus: group.substatus,
                priority: group.priority,
                first_release: group.first_release_id,
                first_seen: format_first_seen(group.first_seen),
                num_comments: group.num_comments,
                timestamp: timestamp.clone(),
                assignee_user_id: assignee.and_then(|a| a.user_id),
                assignee_team_id: assignee.and_then(|a| a.team_id),
                owner_suspect_commit_user_id: suspect_commit.and_then(|o| o.user_id),
                owner_ownership_rule_user_id: ownership_rule.and_then(|o| o.user_id),
                owner_ownership_rule_team_id: ownership_rule.and_then(|o| o.team_id),
                owner_codeowners_user_id: codeowners.and_then(|o| o.user_id),
                owner_codeowners_team_id: codeowners.and_then(|o| o.team_id),
            }
        })
        .collect()
}

/// Downstream expects microsecond precision and a literal Z suffix
fn format_first_seen(first_seen: NaiveDateTime) -> String {
    first_seen.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn group(id: i64) -> Group {
        Group {
            id,
            project_id: 1,
            status: 1,
            substatus: None,
            first_seen: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            num_comments: 0,
            priority: Some(2),
            first_release_id: None,
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 12, 17, 7, 0).unwrap()
    }

    #[test]
    fn test_group_with_single_ownership_rule_owner() {
        let groups = vec![group(5)];
        let assignees = HashMap::new();
        let mut owners = HashMap::new();
        owners.insert(
            (5, OwnerKind::OwnershipRule),
            GroupOwner {
                group_id: 5,
                kind: OwnerKind::OwnershipRule.as_raw(),
                user_id: Some(9),
                team_id: None,
                date_added: NaiveDate::from_ymd_opt(2024, 1, 2)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            },
        );

        let snapshots = build_snapshots(&groups, &assignees, &owners, generated_at());
        assert_eq!(snapshots.len(), 1);

        let snapshot = &snapshots[0];
        assert!(!snapshot.group_deleted);
        assert_eq!(snapshot.group_id, 5);
        assert_eq!(snapshot.status, 1);
        assert_eq!(snapshot.substatus, None);
        assert_eq!(snapshot.priority, Some(2));
        assert_eq!(snapshot.first_release, None);
        assert_eq!(snapshot.num_comments, 0);
        assert_eq!(snapshot.first_seen, "2024-01-01T00:00:00.000000Z");
        assert_eq!(snapshot.assignee_user_id, None);
        assert_eq!(snapshot.assignee_team_id, None);
        assert_eq!(snapshot.owner_suspect_commit_user_id, None);
        assert_eq!(snapshot.owner_ownership_rule_user_id, Some(9));
        assert_eq!(snapshot.owner_ownership_rule_team_id, None);
        assert_eq!(snapshot.owner_codeowners_user_id, None);
        assert_eq!(snapshot.owner_codeowners_team_id, None);
    }

    #[test]
    fn test_no_related_rows_yields_all_nulls() {
        let snapshots =
            build_snapshots(&[group(7)], &HashMap::new(), &HashMap::new(), generated_at());
        let snapshot = &snapshots[0];
        assert_eq!(snapshot.assignee_user_id, None);
        assert_eq!(snapshot.assignee_team_id, None);
        assert_eq!(snapshot.owner_suspect_commit_user_id, None);
        assert_eq!(snapshot.owner_ownership_rule_user_id, None);
        assert_eq!(snapshot.owner_ownership_rule_team_id, None);
        assert_eq!(snapshot.owner_codeowners_user_id, None);
        assert_eq!(snapshot.owner_codeowners_team_id, None);
    }

    #[test]
    fn test_input_order_preserved() {
        let groups = vec![group(30), group(10), group(20)];
        let snapshots =
            build_snapshots(&groups, &HashMap::new(), &HashMap::new(), generated_at());
        let ids: Vec<i64> = snapshots.iter().map(|s| s.group_id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_first_seen_keeps_microseconds() {
        let mut g = group(1);
        g.first_seen = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_micro_opt(12, 30, 45, 123_456)
            .unwrap();
        let snapshots =
            build_snapshots(&[g], &HashMap::new(), &HashMap::new(), generated_at());
        assert_eq!(snapshots[0].first_seen, "2024-03-05T12:30:45.123456Z");
    }

    #[test]
    fn test_wire_field_names_and_nulls() {
        let snapshots =
            build_snapshots(&[group(5)], &HashMap::new(), &HashMap::new(), generated_at());
        let value = serde_json::to_value(&snapshots[0]).unwrap();

        assert_eq!(value["group_deleted"], serde_json::json!(false));
        assert_eq!(value["group_id"], serde_json::json!(5));
        assert_eq!(value["project_id"], serde_json::json!(1));
        assert_eq!(value["first_seen"], serde_json::json!("2024-01-01T00:00:00.000000Z"));
        assert!(value["substatus"].is_null());
        assert!(value["assignee_user_id"].is_null());
        assert!(value["owner_codeowners_team_id"].is_null());
        assert!(value["timestamp"].is_string());

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 17);
    }
}
