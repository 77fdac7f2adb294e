//! Apps domain state

use std::sync::Arc;

use axum::extract::FromRef;
use slotline_auth::AuthBackend;

use crate::repository::CredentialStore;

/// Application state for the Apps domain
#[derive(Clone)]
pub struct AppsState {
    pub credentials: Arc<dyn CredentialStore>,
    pub auth: AuthBackend,
}

impl FromRef<AppsState> for AuthBackend {
    fn from_ref(state: &AppsState) -> Self {
        state.auth.clone()
    }
}
