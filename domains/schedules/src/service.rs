//! Schedule use cases
//!
//! Every operation is scoped to the calling user: schedules owned by someone
//! else are reported as forbidden, missing ones as not found.

use std::sync::Arc;

use slotline_common::{Error, Result};

use crate::domain::entities::{
    default_availability, NewSchedule, Schedule, ScheduleAvailability, ScheduleOutput,
    ScheduleOverride, SchedulePatch,
};
use crate::repository::ScheduleStore;

/// Input for creating a schedule
#[derive(Debug, Clone)]
pub struct CreateSchedule {
    pub name: String,
    pub time_zone: String,
    pub is_default: bool,
    pub availability: Option<Vec<ScheduleAvailability>>,
    pub overrides: Option<Vec<ScheduleOverride>>,
}

/// Input for updating a schedule
#[derive(Debug, Clone, Default)]
pub struct UpdateSchedule {
    pub patch: SchedulePatch,
    pub is_default: Option<bool>,
}

#[derive(Clone)]
pub struct SchedulesService {
    store: Arc<dyn ScheduleStore>,
}

impl SchedulesService {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self { store }
    }

    pub async fn create_user_schedule(
        &self,
        user_id: i64,
        input: CreateSchedule,
    ) -> Result<ScheduleOutput> {
        let availability = input.availability.unwrap_or_else(default_availability);
        let overrides = input.overrides.unwrap_or_default();
        validate_ranges(&availability, &overrides)?;

        let schedule = self
            .store
            .create(
                NewSchedule {
                    user_id,
                    name: input.name,
                    time_zone: input.time_zone,
                    availability,
                    overrides,
                },
                input.is_default,
            )
            .await?;

        tracing::info!(
            user_id,
            schedule_id = schedule.id,
            is_default = input.is_default,
            "Schedule created"
        );

        let is_default = self.is_default(user_id, schedule.id).await?;
        Ok(schedule.into_output(is_default))
    }

    pub async fn get_user_schedule_default(&self, user_id: i64) -> Result<ScheduleOutput> {
        let schedule_id = self
            .store
            .default_schedule_id(user_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("User with id={} has no default schedule", user_id))
            })?;

        let schedule = self.store.find(schedule_id).await?.ok_or_else(|| {
            Error::NotFound(format!("Schedule with id={} not found", schedule_id))
        })?;

        Ok(schedule.into_output(true))
    }

    pub async fn get_user_schedule(&self, user_id: i64, schedule_id: i64) -> Result<ScheduleOutput> {
        let schedule = self.owned_schedule(user_id, schedule_id).await?;
        let is_default = self.is_default(user_id, schedule.id).await?;
        Ok(schedule.into_output(is_default))
    }

    pub async fn get_user_schedules(&self, user_id: i64) -> Result<Vec<ScheduleOutput>> {
        let default_id = self.store.default_schedule_id(user_id).await?;
        let schedules = self.store.list_for_user(user_id).await?;

        Ok(schedules
            .into_iter()
            .map(|s| {
                let is_default = Some(s.id) == default_id;
                s.into_output(is_default)
            })
            .collect())
    }

    pub async fn update_user_schedule(
        &self,
        user_id: i64,
        schedule_id: i64,
        input: UpdateSchedule,
    ) -> Result<ScheduleOutput> {
        let existing = self.owned_schedule(user_id, schedule_id).await?;

        let availability = input
            .patch
            .availability
            .as_deref()
            .unwrap_or(&existing.availability.0);
        let overrides = input
            .patch
            .overrides
            .as_deref()
            .unwrap_or(&existing.overrides.0);
        validate_ranges(availability, overrides)?;

        let updated = self
            .store
            .update(schedule_id, &input.patch, input.is_default)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Schedule with id={} not found", schedule_id)))?;

        tracing::info!(user_id, schedule_id, "Schedule updated");

        let is_default = self.is_default(user_id, schedule_id).await?;
        Ok(updated.into_output(is_default))
    }

    pub async fn delete_user_schedule(&self, user_id: i64, schedule_id: i64) -> Result<()> {
        self.owned_schedule(user_id, schedule_id).await?;

        if !self.store.delete(schedule_id).await? {
            return Err(Error::NotFound(format!(
                "Schedule with id={} not found",
                schedule_id
            )));
        }

        tracing::info!(user_id, schedule_id, "Schedule deleted");
        Ok(())
    }

    async fn owned_schedule(&self, user_id: i64, schedule_id: i64) -> Result<Schedule> {
        let schedule = self
            .store
            .find(schedule_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Schedule with id={} not found", schedule_id)))?;
        schedule.ensure_owned_by(user_id)?;
        Ok(schedule)
    }

    async fn is_default(&self, user_id: i64, schedule_id: i64) -> Result<bool> {
        Ok(self.store.default_schedule_id(user_id).await? == Some(schedule_id))
    }
}

fn validate_ranges(
    availability: &[ScheduleAvailability],
    overrides: &[ScheduleOverride],
) -> Result<()> {
    availability.iter().try_for_each(ScheduleAvailability::validate)?;
    overrides.iter().try_for_each(ScheduleOverride::validate)
}
