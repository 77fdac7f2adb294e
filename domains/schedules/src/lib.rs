//! Schedules domain: availability templates owned by a user

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

pub use domain::entities::*;
pub use repository::{InMemoryScheduleStore, PgScheduleStore, ScheduleStore};
pub use service::SchedulesService;

pub use api::routes;
pub use api::SchedulesState;
