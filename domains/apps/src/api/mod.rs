//! API layer for the Apps domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::AppsState;
pub use routes::routes;
