//! In-memory credential store

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use slotline_common::{Error, Result};
use sqlx::types::Json;

use super::CredentialStore;
use crate::domain::entities::{Credential, NewCredential};

#[derive(Debug, Default)]
struct CredentialData {
    next_id: i64,
    credentials: Vec<Credential>,
    /// (team_id, user_id) pairs holding the owner or admin role
    team_admins: HashSet<(i64, i64)>,
    reject_inserts: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    data: Arc<Mutex<CredentialData>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` return no row, as a store that silently drops inserts would
    pub fn reject_inserts(&self) {
        if let Ok(mut data) = self.data.lock() {
            data.reject_inserts = true;
        }
    }

    pub fn add_team_admin(&self, team_id: i64, user_id: i64) {
        if let Ok(mut data) = self.data.lock() {
            data.team_admins.insert((team_id, user_id));
        }
    }

    /// Snapshot of every stored credential
    pub fn credentials(&self) -> Vec<Credential> {
        self.data
            .lock()
            .map(|data| data.credentials.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CredentialData>> {
        self.data
            .lock()
            .map_err(|e| Error::Internal(format!("credential store lock poisoned: {e}")))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_app_id_and_user_id(
        &self,
        app_id: &str,
        user_id: i64,
    ) -> Result<Option<Credential>> {
        Ok(self
            .lock()?
            .credentials
            .iter()
            .find(|c| c.app_id == app_id && c.user_id == Some(user_id))
            .cloned())
    }

    async fn is_team_admin(&self, team_id: i64, user_id: i64) -> Result<bool> {
        Ok(self.lock()?.team_admins.contains(&(team_id, user_id)))
    }

    async fn create(&self, credential: NewCredential) -> Result<Option<Credential>> {
        let mut data = self.lock()?;
        if data.reject_inserts {
            return Ok(None);
        }

        data.next_id += 1;
        let created = Credential {
            id: data.next_id,
            app_type: credential.app_type,
            key: Json(credential.key),
            user_id: credential.owner.user_id(),
            team_id: credential.owner.team_id(),
            app_id: credential.app_id,
            subscription_id: credential.subscription_id,
            payment_status: credential.payment_status,
            billing_cycle_start: credential.billing_cycle_start,
            delegated_to_id: credential.delegated_to_id,
            invalid: false,
            created_at: Utc::now(),
        };
        data.credentials.push(created.clone());
        Ok(Some(created))
    }
}
