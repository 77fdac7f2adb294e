//! In-memory teams store
//!
//! Holds the same tables the Postgres store touches. A removal unit works on
//! a private copy and swaps it in on commit, so dropping the unit discards
//! every write. Concurrent units are last-writer-wins.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use slotline_common::{Error, Result};
use uuid::Uuid;

use super::{MemberRemovalUnit, TeamsStore};
use crate::domain::entities::{
    DepartingUser, EventType, Host, MemberListQuery, MemberRow, MemberTeam, MemberUser,
    Membership, MembershipRole, Profile, RemovedMembership, Team, TempOrgRedirect, User,
};

/// Removal unit operations, used to make one of them fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalStep {
    DeleteMembership,
    DeleteHosts,
    ClearOrganization,
    FindTeam,
    DeleteSubTeamMemberships,
    FindProfile,
    DeleteRedirects,
    DetachFromOrganization,
    DeleteManagedEventTypes,
    Commit,
}

/// Table contents of an in-memory store
#[derive(Debug, Clone, Default)]
pub struct TeamsData {
    pub teams: BTreeMap<i64, Team>,
    pub users: BTreeMap<i64, User>,
    pub memberships: Vec<Membership>,
    pub profiles: Vec<Profile>,
    pub event_types: Vec<EventType>,
    pub hosts: Vec<Host>,
    pub redirects: Vec<TempOrgRedirect>,
    next_id: i64,
    fail_at: Option<RemovalStep>,
}

impl TeamsData {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn membership(&self, user_id: i64, team_id: i64) -> Option<&Membership> {
        self.memberships
            .iter()
            .find(|m| m.user_id == user_id && m.team_id == team_id)
    }

    pub fn profile(&self, user_id: i64, organization_id: i64) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.user_id == user_id && p.organization_id == organization_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamsStore {
    data: Arc<Mutex<TeamsData>>,
}

impl InMemoryTeamsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, TeamsData>> {
        lock(&self.data)
    }

    /// Copy of the current table contents
    pub fn snapshot(&self) -> TeamsData {
        self.data
            .lock()
            .map(|data| data.clone())
            .unwrap_or_default()
    }

    /// Make the given removal step fail in every unit opened afterwards
    pub fn fail_at(&self, step: RemovalStep) {
        if let Ok(mut data) = self.data.lock() {
            data.fail_at = Some(step);
        }
    }

    pub fn insert_team(&self, team: Team) {
        if let Ok(mut data) = self.data.lock() {
            data.teams.insert(team.id, team);
        }
    }

    /// Insert or replace a user
    pub fn insert_user(&self, user: User) {
        if let Ok(mut data) = self.data.lock() {
            data.users.insert(user.id, user);
        }
    }

    pub fn add_membership(&self, user_id: i64, team_id: i64, role: MembershipRole) -> Option<Membership> {
        let mut data = self.data.lock().ok()?;
        let membership = Membership {
            id: data.next_id(),
            user_id,
            team_id,
            role,
            accepted: true,
            created_at: Utc::now(),
        };
        data.memberships.push(membership.clone());
        Some(membership)
    }

    pub fn add_profile(&self, user_id: i64, organization_id: i64, username: &str) -> Option<Profile> {
        let mut data = self.data.lock().ok()?;
        let profile = Profile {
            id: data.next_id(),
            uid: Uuid::new_v4(),
            user_id,
            organization_id,
            username: username.to_string(),
        };
        data.profiles.push(profile.clone());
        Some(profile)
    }

    /// Add an event type; `parent_id` marks a managed copy of a team template
    pub fn add_event_type(
        &self,
        title: &str,
        team_id: Option<i64>,
        user_id: Option<i64>,
        parent_id: Option<i64>,
    ) -> Option<EventType> {
        let mut data = self.data.lock().ok()?;
        let event_type = EventType {
            id: data.next_id(),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            team_id,
            user_id,
            parent_id,
        };
        data.event_types.push(event_type.clone());
        Some(event_type)
    }

    pub fn add_host(&self, user_id: i64, event_type_id: i64) {
        if let Ok(mut data) = self.data.lock() {
            data.hosts.push(Host {
                user_id,
                event_type_id,
                is_fixed: false,
            });
        }
    }

    pub fn add_redirect(&self, from_username: &str, to_url: &str, from_org_id: i64) {
        if let Ok(mut data) = self.data.lock() {
            let id = data.next_id();
            data.redirects.push(TempOrgRedirect {
                id,
                from_username: from_username.to_string(),
                to_url: to_url.to_string(),
                from_org_id,
            });
        }
    }
}

fn lock(data: &Mutex<TeamsData>) -> Result<MutexGuard<'_, TeamsData>> {
    data.lock()
        .map_err(|e| Error::Internal(format!("teams store lock poisoned: {e}")))
}

fn member_row(membership: &Membership, user: &User) -> MemberRow {
    MemberRow {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        role: membership.role,
        accepted: membership.accepted,
    }
}

#[async_trait]
impl TeamsStore for InMemoryTeamsStore {
    async fn find_team(&self, team_id: i64) -> Result<Option<Team>> {
        Ok(self.lock()?.teams.get(&team_id).cloned())
    }

    async fn find_membership(&self, team_id: i64, user_id: i64) -> Result<Option<Membership>> {
        Ok(self.lock()?.membership(user_id, team_id).cloned())
    }

    async fn list_members(
        &self,
        team_id: i64,
        query: &MemberListQuery,
    ) -> Result<(Vec<MemberRow>, i64)> {
        let data = self.lock()?;
        let mut rows: Vec<MemberRow> = data
            .memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .filter_map(|m| data.users.get(&m.user_id).map(|u| member_row(m, u)))
            .filter(|row| query.search().map_or(true, |term| row.matches(term)))
            .collect();
        rows.sort_by_key(|row| row.id);

        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn begin(&self) -> Result<Box<dyn MemberRemovalUnit>> {
        let working = self.lock()?.clone();
        Ok(Box::new(InMemoryRemovalUnit {
            shared: Arc::clone(&self.data),
            working,
        }))
    }
}

/// Removal unit over a private copy of the tables
pub struct InMemoryRemovalUnit {
    shared: Arc<Mutex<TeamsData>>,
    working: TeamsData,
}

impl InMemoryRemovalUnit {
    fn step(&self, step: RemovalStep) -> Result<()> {
        if self.working.fail_at == Some(step) {
            return Err(Error::Internal(format!("removal step {:?} failed", step)));
        }
        Ok(())
    }
}

#[async_trait]
impl MemberRemovalUnit for InMemoryRemovalUnit {
    async fn delete_membership(
        &mut self,
        user_id: i64,
        team_id: i64,
    ) -> Result<Option<RemovedMembership>> {
        self.step(RemovalStep::DeleteMembership)?;
        let data = &mut self.working;

        let Some(index) = data
            .memberships
            .iter()
            .position(|m| m.user_id == user_id && m.team_id == team_id)
        else {
            return Ok(None);
        };
        let (Some(user), Some(team)) = (data.users.get(&user_id), data.teams.get(&team_id)) else {
            return Ok(None);
        };

        let removed = RemovedMembership {
            id: data.memberships[index].id,
            user_id,
            team_id,
            role: data.memberships[index].role,
            accepted: data.memberships[index].accepted,
            user: MemberUser {
                id: user.id,
                email: user.email.clone(),
                username: user.username.clone(),
                name: user.name.clone(),
            },
            team: MemberTeam {
                id: team.id,
                name: team.name.clone(),
                slug: team.slug.clone(),
                is_organization: team.is_organization,
            },
        };
        data.memberships.remove(index);
        Ok(Some(removed))
    }

    async fn delete_hosts_for_team(&mut self, user_id: i64, team_id: i64) -> Result<u64> {
        self.step(RemovalStep::DeleteHosts)?;
        let data = &mut self.working;

        let team_event_types: Vec<i64> = data
            .event_types
            .iter()
            .filter(|e| e.team_id == Some(team_id))
            .map(|e| e.id)
            .collect();
        let before = data.hosts.len();
        data.hosts
            .retain(|h| !(h.user_id == user_id && team_event_types.contains(&h.event_type_id)));
        Ok((before - data.hosts.len()) as u64)
    }

    async fn clear_organization(&mut self, user_id: i64) -> Result<Option<DepartingUser>> {
        self.step(RemovalStep::ClearOrganization)?;

        Ok(self.working.users.get_mut(&user_id).map(|user| {
            user.organization_id = None;
            DepartingUser {
                id: user.id,
                moved_to_profile_id: user.moved_to_profile_id,
                email: user.email.clone(),
                username: user.username.clone(),
                completed_onboarding: user.completed_onboarding,
            }
        }))
    }

    async fn find_team(&mut self, team_id: i64) -> Result<Option<Team>> {
        self.step(RemovalStep::FindTeam)?;
        Ok(self.working.teams.get(&team_id).cloned())
    }

    async fn delete_sub_team_memberships(
        &mut self,
        user_id: i64,
        parent_team_id: i64,
    ) -> Result<u64> {
        self.step(RemovalStep::DeleteSubTeamMemberships)?;
        let data = &mut self.working;

        let sub_teams: Vec<i64> = data
            .teams
            .values()
            .filter(|t| t.parent_id == Some(parent_team_id))
            .map(|t| t.id)
            .collect();
        let before = data.memberships.len();
        data.memberships
            .retain(|m| !(m.user_id == user_id && sub_teams.contains(&m.team_id)));
        Ok((before - data.memberships.len()) as u64)
    }

    async fn find_profile(&mut self, user_id: i64, organization_id: i64) -> Result<Option<Profile>> {
        self.step(RemovalStep::FindProfile)?;
        Ok(self.working.profile(user_id, organization_id).cloned())
    }

    async fn delete_redirects_from(&mut self, username: &str) -> Result<u64> {
        self.step(RemovalStep::DeleteRedirects)?;
        let data = &mut self.working;

        let before = data.redirects.len();
        data.redirects.retain(|r| r.from_username != username);
        Ok((before - data.redirects.len()) as u64)
    }

    async fn detach_from_organization(&mut self, user_id: i64, organization_id: i64) -> Result<()> {
        self.step(RemovalStep::DetachFromOrganization)?;
        let data = &mut self.working;

        if let Some(user) = data.users.get_mut(&user_id) {
            user.organization_id = None;
        }
        let removed: Vec<i64> = data
            .profiles
            .iter()
            .filter(|p| p.user_id == user_id && p.organization_id == organization_id)
            .map(|p| p.id)
            .collect();
        data.profiles
            .retain(|p| !(p.user_id == user_id && p.organization_id == organization_id));
        // ON DELETE SET NULL on users.moved_to_profile_id
        for user in data.users.values_mut() {
            if user.moved_to_profile_id.is_some_and(|id| removed.contains(&id)) {
                user.moved_to_profile_id = None;
            }
        }
        Ok(())
    }

    async fn delete_managed_event_types(&mut self, user_id: i64, team_id: i64) -> Result<u64> {
        self.step(RemovalStep::DeleteManagedEventTypes)?;
        let data = &mut self.working;

        let team_templates: Vec<i64> = data
            .event_types
            .iter()
            .filter(|e| e.team_id == Some(team_id))
            .map(|e| e.id)
            .collect();
        let is_managed_copy = |e: &EventType| {
            e.user_id == Some(user_id)
                && e.parent_id.is_some_and(|parent| team_templates.contains(&parent))
        };

        let removed: Vec<i64> = data
            .event_types
            .iter()
            .filter(|e| is_managed_copy(*e))
            .map(|e| e.id)
            .collect();
        data.event_types.retain(|e| !removed.contains(&e.id));
        // ON DELETE CASCADE on hosts.event_type_id
        data.hosts.retain(|h| !removed.contains(&h.event_type_id));
        Ok(removed.len() as u64)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.step(RemovalStep::Commit)?;
        let unit = *self;
        let mut shared = lock(&unit.shared)?;
        *shared = unit.working;
        Ok(())
    }
}
