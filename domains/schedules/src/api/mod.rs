//! API layer for the Schedules domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::SchedulesState;
pub use routes::routes;
