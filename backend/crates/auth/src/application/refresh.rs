//! Token Refresh Use Case
//!
//! Silent session extension with strict rotation. The stored record is
//! consulted before the signature: a token that was rotated away or
//! revoked is rejected even if cryptographically valid. Each refresh
//! token works exactly once.

use std::sync::Arc;

use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::tokens::{TokenIssuer, TokenKind, TokenPair};
use crate::domain::entity::refresh_session::RefreshSession;
use crate::domain::repository::{AdminRepository, RefreshSessionRepository};
use crate::domain::value_object::admin_id::AdminId;
use crate::error::{AuthError, AuthResult};

/// Token refresh use case
pub struct RefreshUseCase<A, S>
where
    A: AdminRepository,
    S: RefreshSessionRepository,
{
    admins: Arc<A>,
    sessions: Arc<S>,
    issuer: TokenIssuer,
    config: AuthConfig,
}

impl<A, S> RefreshUseCase<A, S>
where
    A: AdminRepository,
    S: RefreshSessionRepository,
{
    pub fn new(admins: Arc<A>, sessions: Arc<S>, issuer: TokenIssuer, config: AuthConfig) -> Self {
        Self {
            admins,
            sessions,
            issuer,
            config,
        }
    }

    /// Exchange a refresh token for a fresh pair, rotating the session.
    ///
    /// Any verification failure after the stored record was found deletes
    /// that record: a token that reached us but fails validation is either
    /// expired or tampered with, and keeping the row would let the holder
    /// retry forever.
    pub async fn execute(&self, token: Option<&str>, client: &ClientInfo) -> AuthResult<TokenPair> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::MissingRefreshToken),
        };

        // Stored record first: rotation and logout revoke by deleting the
        // row, so an absent row means the token is dead regardless of its
        // signature.
        if self.sessions.find_by_token(token).await?.is_none() {
            return Err(AuthError::InvalidToken);
        }

        let claims = match self.issuer.verify(token, TokenKind::Refresh) {
            Ok(claims) => claims,
            Err(e) => {
                self.sessions.delete_by_token(token).await?;
                tracing::warn!(error = %e, "Stored refresh token failed verification");
                return Err(AuthError::InvalidToken);
            }
        };

        let admin_id: AdminId = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        let admin = match self.admins.find_by_id(&admin_id).await? {
            Some(admin) if admin.can_login() => admin,
            _ => {
                // Admin deleted or deactivated since issuance; the session
                // must not survive either way.
                self.sessions.delete_by_token(token).await?;
                return Err(AuthError::AccountInactive);
            }
        };

        let tokens = self.issuer.mint(&admin)?;

        // Strict rotation: retire the presented token, persist the new one.
        self.sessions.delete_by_token(token).await?;
        let rotated = RefreshSession::new(
            tokens.refresh_token.clone(),
            admin.admin_id,
            client,
            self.config.refresh_ttl(),
        );
        self.sessions.create(&rotated).await?;

        tracing::debug!(admin_id = %admin.admin_id, "Refresh token rotated");

        Ok(tokens)
    }
}
