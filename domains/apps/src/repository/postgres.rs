//! Postgres-backed credential store

use async_trait::async_trait;
use slotline_common::{RepositoryError, Result};
use sqlx::types::Json;
use sqlx::PgPool;

use super::CredentialStore;
use crate::domain::entities::{Credential, NewCredential};

const CREDENTIAL_COLUMNS: &str = "id, type, key, user_id, team_id, app_id, subscription_id, \
    payment_status, billing_cycle_start, delegated_to_id, invalid, created_at";

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_app_id_and_user_id(
        &self,
        app_id: &str,
        user_id: i64,
    ) -> Result<Option<Credential>> {
        let row = sqlx::query_as(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM credentials WHERE app_id = $1 AND user_id = $2 ORDER BY id LIMIT 1"
        ))
        .bind(app_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn is_team_admin(&self, team_id: i64, user_id: i64) -> Result<bool> {
        let is_admin = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM memberships
                WHERE team_id = $1 AND user_id = $2 AND role IN ('owner', 'admin')
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(is_admin)
    }

    async fn create(&self, credential: NewCredential) -> Result<Option<Credential>> {
        let row = sqlx::query_as(&format!(
            r#"
            INSERT INTO credentials (
                type, key, user_id, team_id, app_id,
                subscription_id, payment_status, billing_cycle_start, delegated_to_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CREDENTIAL_COLUMNS}
            "#
        ))
        .bind(&credential.app_type)
        .bind(Json(&credential.key))
        .bind(credential.owner.user_id())
        .bind(credential.owner.team_id())
        .bind(&credential.app_id)
        .bind(&credential.subscription_id)
        .bind(&credential.payment_status)
        .bind(credential.billing_cycle_start)
        .bind(&credential.delegated_to_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        Ok(row)
    }
}
