//! Postgres-backed schedule store

use async_trait::async_trait;
use slotline_common::{RepositoryError, Result};
use sqlx::types::Json;
use sqlx::PgPool;

use super::ScheduleStore;
use crate::domain::entities::{NewSchedule, Schedule, SchedulePatch};

const SCHEDULE_COLUMNS: &str =
    "id, user_id, name, time_zone, availability, overrides, created_at, updated_at";

#[derive(Clone)]
pub struct PgScheduleStore {
    pool: PgPool,
}

impl PgScheduleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn create(&self, schedule: NewSchedule, make_default: bool) -> Result<Schedule> {
        let mut tx = self.pool.begin().await?;

        let created: Schedule = sqlx::query_as(&format!(
            r#"
            INSERT INTO schedules (user_id, name, time_zone, availability, overrides)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(schedule.user_id)
        .bind(&schedule.name)
        .bind(&schedule.time_zone)
        .bind(Json(&schedule.availability))
        .bind(Json(&schedule.overrides))
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::classify)?;

        if make_default {
            sqlx::query("UPDATE users SET default_schedule_id = $2, updated_at = NOW() WHERE id = $1")
                .bind(schedule.user_id)
                .bind(created.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn find(&self, schedule_id: i64) -> Result<Option<Schedule>> {
        let row = sqlx::query_as(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1"
        ))
        .bind(schedule_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Schedule>> {
        let rows = sqlx::query_as(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE user_id = $1 ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(
        &self,
        schedule_id: i64,
        patch: &SchedulePatch,
        is_default: Option<bool>,
    ) -> Result<Option<Schedule>> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<Schedule> = sqlx::query_as(&format!(
            r#"
            UPDATE schedules SET
                name = COALESCE($2, name),
                time_zone = COALESCE($3, time_zone),
                availability = COALESCE($4, availability),
                overrides = COALESCE($5, overrides),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(schedule_id)
        .bind(patch.name.as_deref())
        .bind(patch.time_zone.as_deref())
        .bind(patch.availability.as_ref().map(Json))
        .bind(patch.overrides.as_ref().map(Json))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        match is_default {
            Some(true) => {
                sqlx::query(
                    "UPDATE users SET default_schedule_id = $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(updated.user_id)
                .bind(schedule_id)
                .execute(&mut *tx)
                .await?;
            }
            Some(false) => {
                sqlx::query(
                    r#"
                    UPDATE users SET default_schedule_id = NULL, updated_at = NOW()
                    WHERE id = $1 AND default_schedule_id = $2
                    "#,
                )
                .bind(updated.user_id)
                .bind(schedule_id)
                .execute(&mut *tx)
                .await?;
            }
            None => {}
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, schedule_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<(i64, bool)> = sqlx::query_as(
            r#"
            DELETE FROM schedules s
            USING users u
            WHERE s.id = $1 AND u.id = s.user_id
            RETURNING s.user_id, u.default_schedule_id IS NOT DISTINCT FROM s.id
            "#,
        )
        .bind(schedule_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((user_id, was_default)) = owner else {
            return Ok(false);
        };

        if was_default {
            sqlx::query(
                r#"
                UPDATE users SET
                    default_schedule_id = (
                        SELECT MIN(id) FROM schedules WHERE user_id = $1
                    ),
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn default_schedule_id(&self, user_id: i64) -> Result<Option<i64>> {
        let id: Option<Option<i64>> =
            sqlx::query_scalar("SELECT default_schedule_id FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(id.flatten())
    }
}
