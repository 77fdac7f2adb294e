//! Persistence for app credentials

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use slotline_common::Result;

use crate::domain::entities::{Credential, NewCredential};

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// First credential for the app held directly by the user
    async fn find_by_app_id_and_user_id(
        &self,
        app_id: &str,
        user_id: i64,
    ) -> Result<Option<Credential>>;

    /// Whether the user is an owner or admin of the team
    async fn is_team_admin(&self, team_id: i64, user_id: i64) -> Result<bool>;

    /// Insert a credential. `None` when the store returned no row.
    async fn create(&self, credential: NewCredential) -> Result<Option<Credential>>;
}
