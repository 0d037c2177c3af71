//! Logout Use Cases
//!
//! Single-session logout is idempotent and unauthenticated: whatever
//! refresh token the client presents gets deleted, and the handler clears
//! cookies regardless. Logout-all is an authenticated administrative
//! action that terminates every session for the account.

use std::sync::Arc;

use crate::domain::repository::{AdminRepository, RefreshSessionRepository};
use crate::domain::value_object::admin_id::AdminId;
use crate::error::{AuthError, AuthResult};

/// Logout use case
pub struct LogoutUseCase<A, S>
where
    A: AdminRepository,
    S: RefreshSessionRepository,
{
    admins: Arc<A>,
    sessions: Arc<S>,
}

impl<A, S> LogoutUseCase<A, S>
where
    A: AdminRepository,
    S: RefreshSessionRepository,
{
    pub fn new(admins: Arc<A>, sessions: Arc<S>) -> Self {
        Self { admins, sessions }
    }

    /// Delete the session for one refresh token, if any.
    ///
    /// Missing or unknown tokens are not errors; logging out twice is fine.
    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<()> {
        if let Some(token) = refresh_token.filter(|t| !t.is_empty()) {
            self.sessions.delete_by_token(token).await?;
        }
        Ok(())
    }

    /// Terminate every session for an administrator, returning the count.
    ///
    /// Having zero sessions is a success (nothing to terminate), but a
    /// missing or deactivated account is reported as such.
    pub async fn execute_all(&self, admin_id: &AdminId) -> AuthResult<u64> {
        let admin = self
            .admins
            .find_by_id(admin_id)
            .await?
            .ok_or(AuthError::AdminNotFound)?;

        if !admin.can_login() {
            return Err(AuthError::AccountDeactivated);
        }

        let count = self.sessions.count_for_admin(admin_id).await?;
        if count == 0 {
            return Ok(0);
        }

        let terminated = self.sessions.delete_all_for_admin(admin_id).await?;

        tracing::info!(
            admin_id = %admin_id,
            sessions = terminated,
            "All sessions terminated"
        );

        Ok(terminated)
    }
}
