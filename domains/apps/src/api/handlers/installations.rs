//! App installation handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slotline_auth::{scopes, AuthUser};
use slotline_common::{ApiResponse, Error, Result, ValidatedJson};
use validator::Validate;

use crate::api::middleware::AppsState;
use crate::domain::entities::{CredentialOutput, InstallationArgs};
use crate::installation::{assert_installed, create_default_installation, is_app_installed};

/// Request body for installing an app
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InstallAppInput {
    /// Credential type, e.g. `google_calendar`
    #[validate(length(min = 1, max = 100))]
    pub app_type: String,

    /// Install for a team instead of the caller
    #[validate(range(min = 1))]
    pub team_id: Option<i64>,

    pub key: Option<Value>,

    #[validate(length(max = 255))]
    pub subscription_id: Option<String>,

    #[validate(length(max = 50))]
    pub payment_status: Option<String>,

    #[validate(range(min = 1, max = 31))]
    pub billing_cycle_start: Option<i32>,

    pub delegated_to_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InstalledResponse {
    pub installed: bool,
}

/// Install an app for the caller
///
/// **POST /v1/apps/{slug}/install**
///
/// Fails with 409 when the caller already holds a credential for the app.
/// Installing for a team requires the caller to be owner or admin of it.
pub async fn install_app(
    AuthUser(auth): AuthUser,
    State(state): State<AppsState>,
    Path(slug): Path<String>,
    ValidatedJson(input): ValidatedJson<InstallAppInput>,
) -> Result<(StatusCode, ApiResponse<CredentialOutput>)> {
    auth.require_scopes(&[scopes::APPS_WRITE])?;

    if let Some(team_id) = input.team_id {
        if !state.credentials.is_team_admin(team_id, auth.user_id).await? {
            return Err(Error::Authorization(
                "Access denied: Must be owner or admin to install apps for a team".to_string(),
            ));
        }
    }

    assert_installed(state.credentials.as_ref(), &slug, auth.user_id).await?;

    let credential = create_default_installation(
        state.credentials.as_ref(),
        InstallationArgs {
            app_type: input.app_type,
            user_id: auth.user_id,
            slug,
            key: input.key,
            team_id: input.team_id,
            subscription_id: input.subscription_id,
            payment_status: input.payment_status,
            billing_cycle_start: input.billing_cycle_start,
            delegated_to_id: input.delegated_to_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(credential.into())))
}

/// **GET /v1/apps/{slug}/installed**
pub async fn get_installed(
    AuthUser(auth): AuthUser,
    State(state): State<AppsState>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<InstalledResponse>> {
    auth.require_scopes(&[scopes::APPS_READ])?;

    let installed = is_app_installed(state.credentials.as_ref(), &slug, auth.user_id).await?;
    Ok(ApiResponse::success(InstalledResponse { installed }))
}
