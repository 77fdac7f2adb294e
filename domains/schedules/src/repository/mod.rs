//! Persistence for schedules
//!
//! `ScheduleStore` is the seam between the service and storage. Production
//! uses `PgScheduleStore`; tests and local tooling use `InMemoryScheduleStore`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use slotline_common::Result;

use crate::domain::entities::{NewSchedule, Schedule, SchedulePatch};

pub use memory::InMemoryScheduleStore;
pub use postgres::PgScheduleStore;

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Insert a schedule; when `make_default` is set the user's default pointer moves to it
    async fn create(&self, schedule: NewSchedule, make_default: bool) -> Result<Schedule>;

    async fn find(&self, schedule_id: i64) -> Result<Option<Schedule>>;

    /// All schedules of a user, ordered by id
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Schedule>>;

    /// Apply `patch` and the default-pointer change in one write.
    /// `Some(true)` makes the schedule the owner's default; `Some(false)` clears
    /// the pointer only while it still points at this schedule.
    async fn update(
        &self,
        schedule_id: i64,
        patch: &SchedulePatch,
        is_default: Option<bool>,
    ) -> Result<Option<Schedule>>;

    /// Delete a schedule. If it was the owner's default, the pointer moves to
    /// the owner's lowest-id remaining schedule, or is cleared. Returns false
    /// when nothing was deleted.
    async fn delete(&self, schedule_id: i64) -> Result<bool>;

    async fn default_schedule_id(&self, user_id: i64) -> Result<Option<i64>>;
}
