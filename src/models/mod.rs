//! # Source Data Layer
//!
//! Read-only models for the three source tables the backfill joins:
//! groups, their current assignee, and their ownership records.
//! All fetches are bulk operations keyed by a set of group ids.

pub mod group;
pub mod group_assignee;
pub mod group_owner;

pub use group::Group;
pub use group_assignee::GroupAssignee;
pub use group_owner::{GroupOwner, OwnerKind};
