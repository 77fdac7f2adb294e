//! Postgres-backed teams store

use async_trait::async_trait;
use slotline_common::Result;
use sqlx::{PgPool, Postgres, Transaction};

use super::{MemberRemovalUnit, TeamsStore};
use crate::domain::entities::{
    DepartingUser, MemberListQuery, MemberRow, MemberTeam, MemberUser, Membership,
    MembershipRole, Profile, RemovedMembership, Team,
};

const TEAM_COLUMNS: &str = "id, name, slug, parent_id, is_organization, metadata, created_at";

#[derive(Clone)]
pub struct PgTeamsStore {
    pool: PgPool,
}

impl PgTeamsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%term%` for ILIKE with the term's own wildcards escaped, so the match is a
/// literal substring as in `MemberRow::matches`
fn search_pattern(query: &MemberListQuery) -> Option<String> {
    query.search().map(|term| {
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    })
}

#[async_trait]
impl TeamsStore for PgTeamsStore {
    async fn find_team(&self, team_id: i64) -> Result<Option<Team>> {
        let row = sqlx::query_as(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_membership(&self, team_id: i64, user_id: i64) -> Result<Option<Membership>> {
        let row = sqlx::query_as(
            r#"
            SELECT id, user_id, team_id, role, accepted, created_at
            FROM memberships
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_members(
        &self,
        team_id: i64,
        query: &MemberListQuery,
    ) -> Result<(Vec<MemberRow>, i64)> {
        let pattern = search_pattern(query);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM memberships m
            INNER JOIN users u ON u.id = m.user_id
            WHERE m.team_id = $1
              AND ($2::TEXT IS NULL
                   OR u.email ILIKE $2 ESCAPE '\'
                   OR u.username ILIKE $2 ESCAPE '\'
                   OR u.name ILIKE $2 ESCAPE '\')
            "#,
        )
        .bind(team_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as(
            r#"
            SELECT u.id, u.email, u.username, u.name, m.role, m.accepted
            FROM memberships m
            INNER JOIN users u ON u.id = m.user_id
            WHERE m.team_id = $1
              AND ($2::TEXT IS NULL
                   OR u.email ILIKE $2 ESCAPE '\'
                   OR u.username ILIKE $2 ESCAPE '\'
                   OR u.name ILIKE $2 ESCAPE '\')
            ORDER BY u.id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(team_id)
        .bind(&pattern)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn begin(&self) -> Result<Box<dyn MemberRemovalUnit>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgMemberRemovalUnit { tx }))
    }
}

/// Removal unit backed by one database transaction. Dropping it without
/// `commit` rolls the transaction back.
pub struct PgMemberRemovalUnit {
    tx: Transaction<'static, Postgres>,
}

/// Deleted membership joined with its user and team
#[derive(sqlx::FromRow)]
struct RemovedMembershipRow {
    id: i64,
    user_id: i64,
    team_id: i64,
    role: MembershipRole,
    accepted: bool,
    user_email: String,
    user_username: Option<String>,
    user_name: Option<String>,
    team_name: String,
    team_slug: Option<String>,
    team_is_organization: bool,
}

impl From<RemovedMembershipRow> for RemovedMembership {
    fn from(row: RemovedMembershipRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            team_id: row.team_id,
            role: row.role,
            accepted: row.accepted,
            user: MemberUser {
                id: row.user_id,
                email: row.user_email,
                username: row.user_username,
                name: row.user_name,
            },
            team: MemberTeam {
                id: row.team_id,
                name: row.team_name,
                slug: row.team_slug,
                is_organization: row.team_is_organization,
            },
        }
    }
}

#[async_trait]
impl MemberRemovalUnit for PgMemberRemovalUnit {
    async fn delete_membership(
        &mut self,
        user_id: i64,
        team_id: i64,
    ) -> Result<Option<RemovedMembership>> {
        let row: Option<RemovedMembershipRow> = sqlx::query_as(
            r#"
            WITH deleted AS (
                DELETE FROM memberships
                WHERE user_id = $1 AND team_id = $2
                RETURNING id, user_id, team_id, role, accepted
            )
            SELECT d.id, d.user_id, d.team_id, d.role, d.accepted,
                   u.email AS user_email, u.username AS user_username, u.name AS user_name,
                   t.name AS team_name, t.slug AS team_slug,
                   t.is_organization AS team_is_organization
            FROM deleted d
            INNER JOIN users u ON u.id = d.user_id
            INNER JOIN teams t ON t.id = d.team_id
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(RemovedMembership::from))
    }

    async fn delete_hosts_for_team(&mut self, user_id: i64, team_id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM hosts h
            USING event_types e
            WHERE h.event_type_id = e.id AND e.team_id = $2 AND h.user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn clear_organization(&mut self, user_id: i64) -> Result<Option<DepartingUser>> {
        let row = sqlx::query_as(
            r#"
            UPDATE users
            SET organization_id = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING id, moved_to_profile_id, email, username, completed_onboarding
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn find_team(&mut self, team_id: i64) -> Result<Option<Team>> {
        let row = sqlx::query_as(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(team_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row)
    }

    async fn delete_sub_team_memberships(
        &mut self,
        user_id: i64,
        parent_team_id: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM memberships m
            USING teams t
            WHERE m.team_id = t.id AND t.parent_id = $2 AND m.user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(parent_team_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_profile(&mut self, user_id: i64, organization_id: i64) -> Result<Option<Profile>> {
        let row = sqlx::query_as(
            r#"
            SELECT id, uid, user_id, organization_id, username
            FROM profiles
            WHERE user_id = $1 AND organization_id = $2
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn delete_redirects_from(&mut self, username: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM temp_org_redirects WHERE from_username = $1")
            .bind(username)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn detach_from_organization(&mut self, user_id: i64, organization_id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET organization_id = NULL, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *self.tx)
            .await?;

        sqlx::query("DELETE FROM profiles WHERE user_id = $1 AND organization_id = $2")
            .bind(user_id)
            .bind(organization_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn delete_managed_event_types(&mut self, user_id: i64, team_id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM event_types e
            USING event_types p
            WHERE e.parent_id = p.id AND p.team_id = $2 AND e.user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
