//! Route definitions for the Schedules domain API

use axum::{routing::get, Router};

use super::handlers::schedules;
use super::middleware::SchedulesState;

/// Create all Schedules domain routes
pub fn routes() -> Router<SchedulesState> {
    Router::new()
        .route(
            "/v2/schedules",
            get(schedules::get_schedules).post(schedules::create_schedule),
        )
        .route("/v2/schedules/default", get(schedules::get_default_schedule))
        .route(
            "/v2/schedules/{schedule_id}",
            get(schedules::get_schedule)
                .patch(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
}
