//! Persistence for teams and memberships
//!
//! `TeamsStore` serves the read paths and opens a `MemberRemovalUnit`: a
//! unit of work whose writes land together on `commit` and are discarded
//! when it is dropped uncommitted.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use slotline_common::Result;

use crate::domain::entities::{
    DepartingUser, MemberListQuery, MemberRow, Membership, Profile, RemovedMembership, Team,
};

pub use memory::{InMemoryTeamsStore, RemovalStep};
pub use postgres::PgTeamsStore;

#[async_trait]
pub trait TeamsStore: Send + Sync {
    async fn find_team(&self, team_id: i64) -> Result<Option<Team>>;

    async fn find_membership(&self, team_id: i64, user_id: i64) -> Result<Option<Membership>>;

    /// One page of members plus the total count matching the search
    async fn list_members(
        &self,
        team_id: i64,
        query: &MemberListQuery,
    ) -> Result<(Vec<MemberRow>, i64)>;

    async fn begin(&self) -> Result<Box<dyn MemberRemovalUnit>>;
}

/// Writes performed while removing a member, applied atomically on `commit`
#[async_trait]
pub trait MemberRemovalUnit: Send {
    /// Delete the (user, team) membership, returning it with user and team expanded
    async fn delete_membership(
        &mut self,
        user_id: i64,
        team_id: i64,
    ) -> Result<Option<RemovedMembership>>;

    /// Unassign the user as host from every event type of the team
    async fn delete_hosts_for_team(&mut self, user_id: i64, team_id: i64) -> Result<u64>;

    /// Clear the user's organization and return the fields needed for cleanup
    async fn clear_organization(&mut self, user_id: i64) -> Result<Option<DepartingUser>>;

    async fn find_team(&mut self, team_id: i64) -> Result<Option<Team>>;

    /// Delete the user's memberships in every team whose parent is `parent_team_id`
    async fn delete_sub_team_memberships(&mut self, user_id: i64, parent_team_id: i64)
        -> Result<u64>;

    async fn find_profile(&mut self, user_id: i64, organization_id: i64) -> Result<Option<Profile>>;

    async fn delete_redirects_from(&mut self, username: &str) -> Result<u64>;

    /// Clear the user's organization and delete their profile in it
    async fn detach_from_organization(&mut self, user_id: i64, organization_id: i64) -> Result<()>;

    /// Delete the user's managed copies of the team's event types
    async fn delete_managed_event_types(&mut self, user_id: i64, team_id: i64) -> Result<u64>;

    async fn commit(self: Box<Self>) -> Result<()>;
}
