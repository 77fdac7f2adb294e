//! Schedule API handlers
//!
//! Versioned `/v2/schedules` endpoints. Every handler requires a supported
//! `api-version` header and the matching `schedule:*` scope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use slotline_auth::{scopes, AuthUser};
use slotline_common::{ApiResponse, ApiVersion, Result, ValidatedJson};
use validator::Validate;

use crate::api::middleware::SchedulesState;
use crate::domain::entities::{ScheduleAvailability, ScheduleOutput, ScheduleOverride, SchedulePatch};
use crate::domain::validation::validate_time_zone;
use crate::service::{CreateSchedule, UpdateSchedule};

/// Request body for creating a schedule
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(custom(function = "validate_time_zone", message = "Invalid time zone"))]
    pub time_zone: String,

    pub is_default: bool,

    /// Defaults to Monday-Friday 09:00-17:00 when absent
    pub availability: Option<Vec<ScheduleAvailability>>,

    pub overrides: Option<Vec<ScheduleOverride>>,
}

/// Request body for a partial schedule update
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_time_zone", message = "Invalid time zone"))]
    pub time_zone: Option<String>,

    pub is_default: Option<bool>,

    pub availability: Option<Vec<ScheduleAvailability>>,

    pub overrides: Option<Vec<ScheduleOverride>>,
}

/// **POST /v2/schedules**
pub async fn create_schedule(
    AuthUser(auth): AuthUser,
    _version: ApiVersion,
    State(state): State<SchedulesState>,
    ValidatedJson(input): ValidatedJson<CreateScheduleInput>,
) -> Result<(StatusCode, ApiResponse<ScheduleOutput>)> {
    auth.require_scopes(&[scopes::SCHEDULE_WRITE])?;

    let schedule = state
        .service
        .create_user_schedule(
            auth.user_id,
            CreateSchedule {
                name: input.name,
                time_zone: input.time_zone,
                is_default: input.is_default,
                availability: input.availability,
                overrides: input.overrides,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(schedule)))
}

/// **GET /v2/schedules/default**
pub async fn get_default_schedule(
    AuthUser(auth): AuthUser,
    _version: ApiVersion,
    State(state): State<SchedulesState>,
) -> Result<ApiResponse<ScheduleOutput>> {
    auth.require_scopes(&[scopes::SCHEDULE_READ])?;

    let schedule = state.service.get_user_schedule_default(auth.user_id).await?;
    Ok(ApiResponse::success(schedule))
}

/// **GET /v2/schedules/{scheduleId}**
pub async fn get_schedule(
    AuthUser(auth): AuthUser,
    _version: ApiVersion,
    State(state): State<SchedulesState>,
    Path(schedule_id): Path<i64>,
) -> Result<ApiResponse<ScheduleOutput>> {
    auth.require_scopes(&[scopes::SCHEDULE_READ])?;

    let schedule = state
        .service
        .get_user_schedule(auth.user_id, schedule_id)
        .await?;
    Ok(ApiResponse::success(schedule))
}

/// **GET /v2/schedules**
pub async fn get_schedules(
    AuthUser(auth): AuthUser,
    _version: ApiVersion,
    State(state): State<SchedulesState>,
) -> Result<ApiResponse<Vec<ScheduleOutput>>> {
    auth.require_scopes(&[scopes::SCHEDULE_READ])?;

    let schedules = state.service.get_user_schedules(auth.user_id).await?;
    Ok(ApiResponse::success(schedules))
}

/// **PATCH /v2/schedules/{scheduleId}**
pub async fn update_schedule(
    AuthUser(auth): AuthUser,
    _version: ApiVersion,
    State(state): State<SchedulesState>,
    Path(schedule_id): Path<i64>,
    ValidatedJson(input): ValidatedJson<UpdateScheduleInput>,
) -> Result<ApiResponse<ScheduleOutput>> {
    auth.require_scopes(&[scopes::SCHEDULE_WRITE])?;

    let schedule = state
        .service
        .update_user_schedule(
            auth.user_id,
            schedule_id,
            UpdateSchedule {
                patch: SchedulePatch {
                    name: input.name,
                    time_zone: input.time_zone,
                    availability: input.availability,
                    overrides: input.overrides,
                },
                is_default: input.is_default,
            },
        )
        .await?;
    Ok(ApiResponse::success(schedule))
}

/// **DELETE /v2/schedules/{scheduleId}**
pub async fn delete_schedule(
    AuthUser(auth): AuthUser,
    _version: ApiVersion,
    State(state): State<SchedulesState>,
    Path(schedule_id): Path<i64>,
) -> Result<ApiResponse<()>> {
    auth.require_scopes(&[scopes::SCHEDULE_WRITE])?;

    state
        .service
        .delete_user_schedule(auth.user_id, schedule_id)
        .await?;
    Ok(ApiResponse::confirmed())
}
