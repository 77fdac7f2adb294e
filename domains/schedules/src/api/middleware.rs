//! Schedules domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use slotline_auth::AuthBackend;

use crate::repository::ScheduleStore;
use crate::service::SchedulesService;

/// Application state for the Schedules domain
#[derive(Clone)]
pub struct SchedulesState {
    pub service: SchedulesService,
    pub auth: AuthBackend,
}

impl SchedulesState {
    pub fn new(store: Arc<dyn ScheduleStore>, auth: AuthBackend) -> Self {
        Self {
            service: SchedulesService::new(store),
            auth,
        }
    }
}

impl FromRef<SchedulesState> for AuthBackend {
    fn from_ref(state: &SchedulesState) -> Self {
        state.auth.clone()
    }
}
