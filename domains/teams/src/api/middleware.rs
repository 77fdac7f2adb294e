//! Teams domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use slotline_auth::AuthBackend;

use crate::repository::TeamsStore;

/// Application state for the Teams domain
#[derive(Clone)]
pub struct TeamsState {
    pub store: Arc<dyn TeamsStore>,
    pub auth: AuthBackend,
}

impl FromRef<TeamsState> for AuthBackend {
    fn from_ref(state: &TeamsState) -> Self {
        state.auth.clone()
    }
}
