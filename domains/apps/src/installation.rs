//! Installation helper shared by app installers

use slotline_common::{Error, Result};

use crate::domain::entities::{Credential, InstallationArgs};
use crate::repository::CredentialStore;

/// Fail with a conflict when the user already holds a credential for `slug`
pub async fn assert_installed(store: &dyn CredentialStore, slug: &str, user_id: i64) -> Result<()> {
    if store
        .find_by_app_id_and_user_id(slug, user_id)
        .await?
        .is_some()
    {
        tracing::debug!(slug, user_id, "App already installed");
        return Err(Error::Conflict("Already installed".to_string()));
    }
    Ok(())
}

pub async fn is_app_installed(store: &dyn CredentialStore, app_id: &str, user_id: i64) -> Result<bool> {
    Ok(store
        .find_by_app_id_and_user_id(app_id, user_id)
        .await?
        .is_some())
}

/// Store the credential for a fresh installation.
///
/// The credential belongs to `args.team_id` when present, otherwise to the user.
pub async fn create_default_installation(
    store: &dyn CredentialStore,
    args: InstallationArgs,
) -> Result<Credential> {
    let app_type = args.app_type.clone();
    let installation = store
        .create(args.into_new_credential())
        .await?
        .ok_or_else(|| {
            Error::Internal(format!(
                "Unable to create user credential for type {}",
                app_type
            ))
        })?;

    tracing::info!(
        credential_id = installation.id,
        app_id = %installation.app_id,
        user_id = ?installation.user_id,
        team_id = ?installation.team_id,
        "App installed"
    );

    Ok(installation)
}
