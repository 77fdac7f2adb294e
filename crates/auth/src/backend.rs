//! Concrete authentication backend
//!
//! Holds the verification settings for bearer tokens. Identity lives in the
//! token itself; domains load whatever user state they need from their own stores.

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Validate a bearer token and build the caller's context
    pub(crate) fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;

        let user_id: i64 = claims.sub.parse().map_err(|_| {
            tracing::debug!(sub = %claims.sub, "Token subject is not a numeric user id");
            AuthError::InvalidUserId
        })?;

        Ok(AuthContext::new(user_id, claims.email, claims.scopes))
    }
}
