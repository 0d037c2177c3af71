//! Login Use Case
//!
//! Credential verification with a source-address lockout gate. Order
//! matters: the lockout is checked BEFORE any credential-store access, so
//! a locked-out address cannot probe accounts at all, not even with the
//! right password.

use std::sync::Arc;

use platform::client::ClientInfo;
use platform::lockout::LockoutPolicy;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::tokens::{TokenIssuer, TokenPair};
use crate::domain::entity::admin::Admin;
use crate::domain::entity::refresh_session::RefreshSession;
use crate::domain::repository::{AdminRepository, FailedAttemptRepository, RefreshSessionRepository};
use crate::domain::value_object::username::Username;
use crate::error::{AuthError, AuthResult};

/// Successful login result
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub tokens: TokenPair,
    pub admin: Admin,
}

/// Login use case
pub struct LoginUseCase<A, F, S>
where
    A: AdminRepository,
    F: FailedAttemptRepository,
    S: RefreshSessionRepository,
{
    admins: Arc<A>,
    failures: Arc<F>,
    sessions: Arc<S>,
    issuer: TokenIssuer,
    config: AuthConfig,
}

impl<A, F, S> LoginUseCase<A, F, S>
where
    A: AdminRepository,
    F: FailedAttemptRepository,
    S: RefreshSessionRepository,
{
    pub fn new(
        admins: Arc<A>,
        failures: Arc<F>,
        sessions: Arc<S>,
        issuer: TokenIssuer,
        config: AuthConfig,
    ) -> Self {
        Self {
            admins,
            failures,
            sessions,
            issuer,
            config,
        }
    }

    /// Authenticate an administrator and mint a token pair.
    ///
    /// Failure accounting: unknown username and wrong password both count
    /// against the source address and both surface as the same error. An
    /// inactive account is reported distinctly and does NOT count as a
    /// failure; the caller proved they hold valid credentials.
    pub async fn execute(
        &self,
        username: &str,
        password: &str,
        client: &ClientInfo,
    ) -> AuthResult<LoginOutput> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let key = client.lockout_key();
        self.check_lockout(&key, &self.config.lockout).await?;

        // Invalid usernames cannot exist in the store; skip the lookup but
        // still charge the failure.
        let parsed = match Username::new(username) {
            Ok(parsed) => parsed,
            Err(_) => {
                self.failures.record_failure(&key).await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let mut admin = match self.admins.find_by_username(&parsed).await? {
            Some(admin) => admin,
            None => {
                self.failures.record_failure(&key).await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !admin.can_login() {
            return Err(AuthError::AccountDeactivated);
        }

        let candidate = ClearTextPassword::new_unchecked(password.to_string());
        if !admin.password_hash.verify(&candidate)? {
            self.failures.record_failure(&key).await?;
            return Err(AuthError::InvalidCredentials);
        }

        self.failures.clear(&key).await?;

        admin.record_login();
        self.admins.update(&admin).await?;

        let tokens = self.issuer.mint(&admin)?;

        let session = RefreshSession::new(
            tokens.refresh_token.clone(),
            admin.admin_id,
            client,
            self.config.refresh_ttl(),
        );
        self.sessions.create(&session).await?;

        tracing::info!(
            admin_id = %admin.admin_id,
            ip = %key,
            "Admin login successful"
        );

        Ok(LoginOutput { tokens, admin })
    }

    async fn check_lockout(&self, key: &str, policy: &LockoutPolicy) -> AuthResult<()> {
        if let Some(record) = self.failures.find_by_ip(key).await? {
            if record.is_locked(policy) {
                tracing::warn!(ip = %key, count = record.count, "Login blocked by lockout");
                return Err(AuthError::LockedOut);
            }
        }
        Ok(())
    }
}
