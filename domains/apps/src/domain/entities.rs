//! Domain entities for the Apps domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;

/// Who a credential belongs to. A credential has exactly one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOwner {
    User(i64),
    Team(i64),
}

impl CredentialOwner {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            CredentialOwner::User(id) => Some(*id),
            CredentialOwner::Team(_) => None,
        }
    }

    pub fn team_id(&self) -> Option<i64> {
        match self {
            CredentialOwner::Team(id) => Some(*id),
            CredentialOwner::User(_) => None,
        }
    }
}

/// Stored credential for an installed app
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Credential {
    pub id: i64,
    #[sqlx(rename = "type")]
    pub app_type: String,
    pub key: Json<Value>,
    pub user_id: Option<i64>,
    pub team_id: Option<i64>,
    pub app_id: String,
    pub subscription_id: Option<String>,
    pub payment_status: Option<String>,
    pub billing_cycle_start: Option<i32>,
    pub delegated_to_id: Option<String>,
    pub invalid: bool,
    pub created_at: DateTime<Utc>,
}

/// Arguments for a default installation
#[derive(Debug, Clone, Default)]
pub struct InstallationArgs {
    /// Credential type, e.g. `google_calendar`
    pub app_type: String,
    /// Installing user
    pub user_id: i64,
    /// App-store slug, stored as the credential's app id
    pub slug: String,
    /// Opaque key material; `{}` when absent
    pub key: Option<Value>,
    /// When set the credential belongs to the team instead of the user
    pub team_id: Option<i64>,
    pub subscription_id: Option<String>,
    pub payment_status: Option<String>,
    pub billing_cycle_start: Option<i32>,
    pub delegated_to_id: Option<String>,
}

impl InstallationArgs {
    pub fn owner(&self) -> CredentialOwner {
        match self.team_id {
            Some(team_id) => CredentialOwner::Team(team_id),
            None => CredentialOwner::User(self.user_id),
        }
    }

    pub fn into_new_credential(self) -> NewCredential {
        let owner = self.owner();
        NewCredential {
            app_type: self.app_type,
            key: self.key.unwrap_or_else(|| Value::Object(Default::default())),
            owner,
            app_id: self.slug,
            subscription_id: self.subscription_id,
            payment_status: self.payment_status,
            billing_cycle_start: self.billing_cycle_start,
            delegated_to_id: self.delegated_to_id,
        }
    }
}

/// Credential row about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewCredential {
    pub app_type: String,
    pub key: Value,
    pub owner: CredentialOwner,
    pub app_id: String,
    pub subscription_id: Option<String>,
    pub payment_status: Option<String>,
    pub billing_cycle_start: Option<i32>,
    pub delegated_to_id: Option<String>,
}

/// Credential as returned by the API. Key material is never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialOutput {
    pub id: i64,
    #[serde(rename = "type")]
    pub app_type: String,
    pub app_id: String,
    pub user_id: Option<i64>,
    pub team_id: Option<i64>,
    pub subscription_id: Option<String>,
    pub payment_status: Option<String>,
    pub billing_cycle_start: Option<i32>,
    pub invalid: bool,
}

impl From<Credential> for CredentialOutput {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id,
            app_type: credential.app_type,
            app_id: credential.app_id,
            user_id: credential.user_id,
            team_id: credential.team_id,
            subscription_id: credential.subscription_id,
            payment_status: credential.payment_status,
            billing_cycle_start: credential.billing_cycle_start,
            invalid: credential.invalid,
        }
    }
}
