//! In-memory schedule store
//!
//! Mirrors the Postgres store's behavior for tests and local tooling.
//! Thread-safe via `Arc<Mutex<>>`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use slotline_common::{Error, Result};
use sqlx::types::Json;

use super::ScheduleStore;
use crate::domain::entities::{NewSchedule, Schedule, SchedulePatch};

#[derive(Debug, Default)]
struct ScheduleData {
    next_id: i64,
    schedules: BTreeMap<i64, Schedule>,
    defaults: HashMap<i64, i64>,
    fail_writes: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleStore {
    data: Arc<Mutex<ScheduleData>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `update` and `delete` fail before touching any data
    pub fn fail_writes(&self) {
        if let Ok(mut data) = self.data.lock() {
            data.fail_writes = true;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ScheduleData>> {
        self.data
            .lock()
            .map_err(|e| Error::Internal(format!("schedule store lock poisoned: {e}")))
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn create(&self, schedule: NewSchedule, make_default: bool) -> Result<Schedule> {
        let mut data = self.lock()?;
        data.next_id += 1;

        let now = Utc::now();
        let created = Schedule {
            id: data.next_id,
            user_id: schedule.user_id,
            name: schedule.name,
            time_zone: schedule.time_zone,
            availability: Json(schedule.availability),
            overrides: Json(schedule.overrides),
            created_at: now,
            updated_at: now,
        };

        data.schedules.insert(created.id, created.clone());
        if make_default {
            data.defaults.insert(created.user_id, created.id);
        }
        Ok(created)
    }

    async fn find(&self, schedule_id: i64) -> Result<Option<Schedule>> {
        Ok(self.lock()?.schedules.get(&schedule_id).cloned())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Schedule>> {
        Ok(self
            .lock()?
            .schedules
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        schedule_id: i64,
        patch: &SchedulePatch,
        is_default: Option<bool>,
    ) -> Result<Option<Schedule>> {
        let mut data = self.lock()?;
        if data.fail_writes {
            return Err(Error::Internal("schedule store rejected the write".to_string()));
        }

        let Some(schedule) = data.schedules.get_mut(&schedule_id) else {
            return Ok(None);
        };
        patch.apply_to(schedule);
        let updated = schedule.clone();

        match is_default {
            Some(true) => {
                data.defaults.insert(updated.user_id, schedule_id);
            }
            Some(false) if data.defaults.get(&updated.user_id) == Some(&schedule_id) => {
                data.defaults.remove(&updated.user_id);
            }
            _ => {}
        }
        Ok(Some(updated))
    }

    async fn delete(&self, schedule_id: i64) -> Result<bool> {
        let mut data = self.lock()?;
        if data.fail_writes {
            return Err(Error::Internal("schedule store rejected the write".to_string()));
        }

        let Some(removed) = data.schedules.remove(&schedule_id) else {
            return Ok(false);
        };

        if data.defaults.get(&removed.user_id) == Some(&schedule_id) {
            let next_default = data
                .schedules
                .values()
                .find(|s| s.user_id == removed.user_id)
                .map(|s| s.id);
            match next_default {
                Some(id) => data.defaults.insert(removed.user_id, id),
                None => data.defaults.remove(&removed.user_id),
            };
        }
        Ok(true)
    }

    async fn default_schedule_id(&self, user_id: i64) -> Result<Option<i64>> {
        Ok(self.lock()?.defaults.get(&user_id).copied())
    }
}
