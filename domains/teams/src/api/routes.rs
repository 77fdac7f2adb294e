//! Route definitions for Teams domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::members;
use super::middleware::TeamsState;

/// Create team membership routes
fn membership_routes() -> Router<TeamsState> {
    Router::new()
        .route("/v1/teams/{team_id}/members", get(members::list_members))
        .route("/v1/teams/remove-member", post(members::remove_member))
}

/// Create all Teams domain routes
pub fn routes() -> Router<TeamsState> {
    Router::new().merge(membership_routes())
}
