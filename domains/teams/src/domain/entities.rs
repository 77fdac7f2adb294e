//! Domain entities for the Teams domain
//!
//! Teams nest one level: an organization is a team with `is_organization`
//! set, and its sub-teams point at it through `parent_id`. Users affiliated
//! with an organization carry one profile per organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use uuid::Uuid;

/// Membership role within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Owner,
    Admin,
    #[default]
    Member,
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipRole::Owner => write!(f, "owner"),
            MembershipRole::Admin => write!(f, "admin"),
            MembershipRole::Member => write!(f, "member"),
        }
    }
}

impl MembershipRole {
    /// Check if this role can perform admin actions
    pub fn can_admin(&self) -> bool {
        matches!(self, MembershipRole::Owner | MembershipRole::Admin)
    }

    /// Check if this role is owner
    pub fn is_owner(&self) -> bool {
        matches!(self, MembershipRole::Owner)
    }
}

/// Team or organization
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<i64>,
    pub is_organization: bool,
    pub metadata: Json<Value>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: None,
            parent_id: None,
            is_organization: false,
            metadata: Json(Value::Object(Default::default())),
            created_at: Utc::now(),
        }
    }

    /// An organization with no parent
    pub fn organization(id: i64, name: impl Into<String>) -> Self {
        Self {
            is_organization: true,
            ..Self::new(id, name)
        }
    }

    /// A team nested under `parent_id`
    pub fn sub_team(id: i64, name: impl Into<String>, parent_id: i64) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id, name)
        }
    }
}

/// User row as the teams domain sees it
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub organization_id: Option<i64>,
    pub moved_to_profile_id: Option<i64>,
    pub completed_onboarding: bool,
}

impl User {
    pub fn new(id: i64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            username: None,
            name: None,
            organization_id: None,
            moved_to_profile_id: None,
            completed_onboarding: true,
        }
    }
}

/// Membership of a user in a team
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Membership {
    pub id: i64,
    pub user_id: i64,
    pub team_id: i64,
    pub role: MembershipRole,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-organization identity of a user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    pub uid: Uuid,
    pub user_id: i64,
    pub organization_id: i64,
    pub username: String,
}

/// Event type owned by a team or a user. Managed copies point at their team
/// template through `parent_id`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EventType {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub team_id: Option<i64>,
    pub user_id: Option<i64>,
    pub parent_id: Option<i64>,
}

/// A user assigned as host of an event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct Host {
    pub user_id: i64,
    pub event_type_id: i64,
    pub is_fixed: bool,
}

/// Redirect left behind when a user's username moved into an organization
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TempOrgRedirect {
    pub id: i64,
    pub from_username: String,
    pub to_url: String,
    pub from_org_id: i64,
}

/// User fields loaded when the user leaves an organization
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DepartingUser {
    pub id: i64,
    pub moved_to_profile_id: Option<i64>,
    pub email: String,
    pub username: Option<String>,
    pub completed_onboarding: bool,
}

impl DepartingUser {
    /// The redirect from the user's old username is stale only when the user
    /// was moved onto `profile`. A missing profile never matches.
    pub fn has_redirect_for(&self, profile: Option<&Profile>) -> Option<&str> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        match (self.moved_to_profile_id, profile) {
            (Some(moved_to), Some(profile)) if moved_to == profile.id => Some(username),
            _ => None,
        }
    }
}

/// Summary of the user attached to a removed membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUser {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
}

/// Summary of the team attached to a removed membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeam {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub is_organization: bool,
}

/// A deleted membership with its user and team expanded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedMembership {
    pub id: i64,
    pub user_id: i64,
    pub team_id: i64,
    pub role: MembershipRole,
    pub accepted: bool,
    pub user: MemberUser,
    pub team: MemberTeam,
}

/// Row of a team's member list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberRow {
    /// User id
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub role: MembershipRole,
    pub accepted: bool,
}

impl MemberRow {
    /// Case-insensitive match on email, username, or name
    pub fn matches(&self, search_term: &str) -> bool {
        let needle = search_term.to_lowercase();
        std::iter::once(Some(self.email.as_str()))
            .chain([self.username.as_deref(), self.name.as_deref()])
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Paging and filter for member listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberListQuery {
    pub offset: i64,
    pub limit: i64,
    pub search_term: Option<String>,
}

impl MemberListQuery {
    /// Blank search terms list everyone
    pub fn search(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListMeta {
    pub total_row_count: i64,
}

/// One page of a member listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPage {
    pub rows: Vec<MemberRow>,
    pub meta: MemberListMeta,
    /// Offset of the next page; absent on the last page
    pub next_cursor: Option<i64>,
}

impl MemberPage {
    pub fn new(rows: Vec<MemberRow>, total_row_count: i64, query: &MemberListQuery) -> Self {
        let next = query.offset + rows.len() as i64;
        Self {
            next_cursor: (!rows.is_empty() && next < total_row_count).then_some(next),
            rows,
            meta: MemberListMeta { total_row_count },
        }
    }
}
