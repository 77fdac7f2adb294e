//! Slotline application composition root
//!
//! Composes the schedules, apps and teams routers into a single application.

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use slotline_apps::{AppsState, PgCredentialStore};
use slotline_auth::{AuthBackend, AuthConfig};
use slotline_common::config::Config;
use slotline_common::API_VERSION_HEADER;
use slotline_schedules::{PgScheduleStore, SchedulesState};
use slotline_teams::{PgTeamsStore, TeamsState};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let auth = AuthBackend::new(AuthConfig::from(&config));

    let schedules_state = SchedulesState::new(Arc::new(PgScheduleStore::new(pool.clone())), auth.clone());
    let apps_state = AppsState {
        credentials: Arc::new(PgCredentialStore::new(pool.clone())),
        auth: auth.clone(),
    };
    let teams_state = TeamsState {
        store: Arc::new(PgTeamsStore::new(pool)),
        auth,
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("Slotline API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(slotline_schedules::routes().with_state(schedules_state))
        .merge(slotline_apps::routes().with_state(apps_state))
        .merge(slotline_teams::routes().with_state(teams_state));

    Ok(app)
}

/// CORS layer for a comma-separated origin list; `*` allows any origin
pub fn build_cors_layer(origins: &str) -> CorsLayer {
    let allow_origin = if origins.trim() == "*" {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(API_VERSION_HEADER),
        ])
}

pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
