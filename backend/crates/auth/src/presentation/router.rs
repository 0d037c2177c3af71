//! Auth Router
//!
//! Route table for the auth endpoints. Login, refresh, and logout are
//! public (logout must work with an expired access token); everything
//! else sits behind the access-token middleware, with logout-all further
//! restricted to the admin role.

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};

use crate::application::config::AuthConfig;
use crate::domain::repository::{
    AdminRepository, FailedAttemptRepository, RefreshSessionRepository,
};
use crate::error::AuthResult;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{
    AuthAppState, get_profile, login, logout, logout_all, refresh_token, update_profile, verify,
};
use crate::presentation::middleware::{AuthMiddlewareState, require_admin, require_auth};

/// Build the auth router backed by PostgreSQL
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> AuthResult<Router> {
    auth_router_generic(repo, config)
}

/// Build the auth router over any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> AuthResult<Router>
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = AuthAppState::new(repo, config)?;
    let middleware_state = AuthMiddlewareState {
        config: state.config.clone(),
        issuer: state.issuer.clone(),
    };

    let public = Router::new()
        .route("/login", post(login::<R>))
        .route("/refresh-token", post(refresh_token::<R>))
        .route("/logout", post(logout::<R>));

    let admin_only = Router::new()
        .route("/logout-all", post(logout_all::<R>))
        .layer(from_fn(require_admin));

    let protected = Router::new()
        .route("/verify", get(verify))
        .route("/profile", get(get_profile::<R>).put(update_profile::<R>))
        .merge(admin_only)
        .layer(from_fn_with_state(middleware_state, require_auth));

    Ok(public.merge(protected).with_state(state))
}
