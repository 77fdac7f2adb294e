//! Route definitions for the Apps domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::installations;
use super::middleware::AppsState;

/// Create all Apps domain routes
pub fn routes() -> Router<AppsState> {
    Router::new()
        .route("/v1/apps/{slug}/install", post(installations::install_app))
        .route("/v1/apps/{slug}/installed", get(installations::get_installed))
}
