//! Authorization context for authenticated users

use slotline_common::Error;

use crate::scopes::WILDCARD;

/// Represents an authenticated caller
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: Option<String>,
    /// `None` for first-party sessions, which carry every permission
    pub scopes: Option<Vec<String>>,
}

impl AuthContext {
    /// Create new auth context for a user
    pub fn new(user_id: i64, email: Option<String>, scopes: Option<Vec<String>>) -> Self {
        Self {
            user_id,
            email,
            scopes,
        }
    }

    /// Check if the caller holds a scope
    pub fn has_scope(&self, required_scope: &str) -> bool {
        match &self.scopes {
            Some(scopes) => scopes
                .iter()
                .any(|s| s == WILDCARD || s == required_scope),
            None => true,
        }
    }

    /// Fail with 403 unless the caller holds every listed scope
    pub fn require_scopes(&self, required: &[&str]) -> Result<(), Error> {
        if let Some(missing) = required.iter().find(|s| !self.has_scope(s)) {
            tracing::debug!(user_id = self.user_id, scope = %missing, "Missing permission scope");
            return Err(Error::Authorization(format!(
                "Access denied: missing permission {}",
                missing
            )));
        }
        Ok(())
    }
}
