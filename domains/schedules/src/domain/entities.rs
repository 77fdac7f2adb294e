//! Domain entities for the schedules domain
//!
//! A schedule is an availability template: weekly time ranges plus dated
//! overrides, evaluated in the schedule's time zone. Which schedule is the
//! user's default is tracked on the user row, not on the schedule.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use slotline_common::{Error, Result};
use sqlx::types::Json;

/// Day of the week, serialized with its English name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const WORKWEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];
}

/// `HH:MM` wire format for times of day
mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .map_err(|_| D::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }
}

/// Weekly availability range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAvailability {
    pub days: Vec<Weekday>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl ScheduleAvailability {
    pub fn new(days: Vec<Weekday>, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            days,
            start_time,
            end_time,
        }
    }

    /// A range needs at least one day and must end after it starts
    pub fn validate(&self) -> Result<()> {
        if self.days.is_empty() {
            return Err(Error::Validation(
                "Availability must list at least one day".to_string(),
            ));
        }
        validate_range(self.start_time, self.end_time)
    }
}

/// Availability for one specific date, replacing the weekly ranges on that day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverride {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl ScheduleOverride {
    pub fn validate(&self) -> Result<()> {
        validate_range(self.start_time, self.end_time)
    }
}

fn validate_range(start: NaiveTime, end: NaiveTime) -> Result<()> {
    if start >= end {
        return Err(Error::Validation(format!(
            "Start time {} must be before end time {}",
            start.format("%H:%M"),
            end.format("%H:%M")
        )));
    }
    Ok(())
}

/// Monday to Friday, 09:00 to 17:00
pub fn default_availability() -> Vec<ScheduleAvailability> {
    vec![ScheduleAvailability::new(
        Weekday::WORKWEEK.to_vec(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
    )]
}

/// Schedule entity as stored
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Schedule {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub time_zone: String,
    pub availability: Json<Vec<ScheduleAvailability>>,
    pub overrides: Json<Vec<ScheduleOverride>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Check that the schedule belongs to `user_id`
    pub fn ensure_owned_by(&self, user_id: i64) -> Result<()> {
        if self.user_id != user_id {
            return Err(Error::Authorization(format!(
                "Schedule with id={} is not owned by user with id={}",
                self.id, user_id
            )));
        }
        Ok(())
    }

    pub fn into_output(self, is_default: bool) -> ScheduleOutput {
        ScheduleOutput {
            id: self.id,
            owner_id: self.user_id,
            name: self.name,
            time_zone: self.time_zone,
            availability: self.availability.0,
            is_default,
            overrides: self.overrides.0,
        }
    }
}

/// Fields for a schedule about to be inserted
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub user_id: i64,
    pub name: String,
    pub time_zone: String,
    pub availability: Vec<ScheduleAvailability>,
    pub overrides: Vec<ScheduleOverride>,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    pub name: Option<String>,
    pub time_zone: Option<String>,
    pub availability: Option<Vec<ScheduleAvailability>>,
    pub overrides: Option<Vec<ScheduleOverride>>,
}

impl SchedulePatch {
    pub fn apply_to(&self, schedule: &mut Schedule) {
        if let Some(name) = &self.name {
            schedule.name = name.clone();
        }
        if let Some(time_zone) = &self.time_zone {
            schedule.time_zone = time_zone.clone();
        }
        if let Some(availability) = &self.availability {
            schedule.availability = Json(availability.clone());
        }
        if let Some(overrides) = &self.overrides {
            schedule.overrides = Json(overrides.clone());
        }
        schedule.updated_at = Utc::now();
    }
}

/// Schedule as returned by the versioned API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutput {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub time_zone: String,
    pub availability: Vec<ScheduleAvailability>,
    pub is_default: bool,
    pub overrides: Vec<ScheduleOverride>,
}
