//! HTTP Handlers
//!
//! Thin layer between axum and the use cases: extract client identity,
//! run the use case, translate the result to the response envelope and
//! cookie headers. Business rules live in the application layer.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use platform::client::{ClientInfo, extract_client_info};
use platform::cookie::{extract_cookie, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::application::login::LoginUseCase;
use crate::application::logout::LogoutUseCase;
use crate::application::profile::{ProfileUpdate, ProfileUseCase};
use crate::application::refresh::RefreshUseCase;
use crate::application::tokens::{TokenIssuer, TokenPair};
use crate::domain::repository::{
    AdminRepository, FailedAttemptRepository, RefreshSessionRepository,
};
use crate::domain::value_object::admin_id::AdminId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AdminSummary, LoginRequest, LoginResponse, LogoutAllResponse, MessageResponse, ProfileBody,
    ProfileResponse, RefreshResponse, UpdateProfileRequest, UpdateProfileResponse, VerifiedUser,
    VerifyResponse,
};
use crate::presentation::middleware::{AuthUser, clear_auth_cookies};

/// Shared state for the auth routes
pub struct AuthAppState<R>
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<R>,
    pub config: AuthConfig,
    pub issuer: TokenIssuer,
}

impl<R> Clone for AuthAppState<R>
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            issuer: self.issuer.clone(),
        }
    }
}

impl<R> AuthAppState<R>
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let issuer = TokenIssuer::new(&config)?;
        Ok(Self {
            repo: Arc::new(repo),
            config,
            issuer,
        })
    }

    fn login_use_case(&self) -> LoginUseCase<R, R, R> {
        LoginUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.issuer.clone(),
            self.config.clone(),
        )
    }

    fn refresh_use_case(&self) -> RefreshUseCase<R, R> {
        RefreshUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.issuer.clone(),
            self.config.clone(),
        )
    }

    fn logout_use_case(&self) -> LogoutUseCase<R, R> {
        LogoutUseCase::new(self.repo.clone(), self.repo.clone())
    }

    fn profile_use_case(&self) -> ProfileUseCase<R> {
        ProfileUseCase::new(self.repo.clone())
    }
}

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AuthError>
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let Json(body) = reject_bad_json(body)?;

    let client = client_info(&headers, addr);
    let output = state
        .login_use_case()
        .execute(&body.username, &body.password, &client)
        .await?;

    let mut response = Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        access_token: output.tokens.access_token.clone(),
        refresh_token: output.tokens.refresh_token.clone(),
        admin: AdminSummary::from_entity(&output.admin),
    })
    .into_response();

    attach_token_cookies(&mut response, &state.config, &output.tokens);
    Ok(response)
}

/// POST /refresh-token
pub async fn refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let client = client_info(&headers, addr);
    let token = extract_cookie(&headers, &state.config.refresh_cookie_name);

    let tokens = match state
        .refresh_use_case()
        .execute(token.as_deref(), &client)
        .await
    {
        Ok(tokens) => tokens,
        Err(e) => {
            // A rejected refresh means the client's cookies are dead
            // weight; clear them so it falls back to a fresh login.
            let mut response = e.into_response();
            clear_auth_cookies(response.headers_mut(), &state.config);
            return response;
        }
    };

    let mut response = Json(RefreshResponse {
        success: true,
        message: "Token refreshed successfully".to_string(),
        access_token: tokens.access_token.clone(),
        refresh_token: tokens.refresh_token.clone(),
    })
    .into_response();

    attach_token_cookies(&mut response, &state.config, &tokens);
    response
}

/// POST /logout
///
/// Always succeeds and always clears cookies; a session-store hiccup is
/// logged but must not strand the client in a half-logged-out state.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let token = extract_cookie(&headers, &state.config.refresh_cookie_name);

    if let Err(e) = state.logout_use_case().execute(token.as_deref()).await {
        tracing::warn!(error = %e, "Logout session delete failed");
    }

    let mut response = Json(MessageResponse::ok("Logout successful")).into_response();
    clear_auth_cookies(response.headers_mut(), &state.config);
    response
}

/// POST /logout-all (admin only)
pub async fn logout_all<R>(
    State(state): State<AuthAppState<R>>,
    user: axum::Extension<AuthUser>,
) -> Result<Response, AuthError>
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let admin_id: AdminId = user.id.parse().map_err(|_| AuthError::InvalidToken)?;

    let terminated = state.logout_use_case().execute_all(&admin_id).await?;

    let mut response = Json(LogoutAllResponse {
        success: true,
        message: format!("Terminated {terminated} session(s)"),
        sessions_terminated: terminated,
    })
    .into_response();

    clear_auth_cookies(response.headers_mut(), &state.config);
    Ok(response)
}

/// GET /verify
///
/// The middleware already validated the token; echo the principal back.
pub async fn verify(user: axum::Extension<AuthUser>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        user: VerifiedUser {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
        },
    })
}

/// GET /profile
pub async fn get_profile<R>(
    State(state): State<AuthAppState<R>>,
    user: axum::Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AuthError>
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let admin_id: AdminId = user.id.parse().map_err(|_| AuthError::InvalidToken)?;
    let admin = state.profile_use_case().get(&admin_id).await?;

    Ok(Json(ProfileResponse {
        success: true,
        admin: ProfileBody::from_entity(&admin),
    }))
}

/// PUT /profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    user: axum::Extension<AuthUser>,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UpdateProfileResponse>, AuthError>
where
    R: AdminRepository
        + FailedAttemptRepository
        + RefreshSessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let Json(body) = reject_bad_json(body)?;
    let admin_id: AdminId = user.id.parse().map_err(|_| AuthError::InvalidToken)?;

    let output = state
        .profile_use_case()
        .update(
            &admin_id,
            ProfileUpdate {
                username: body.username,
                email: body.email,
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await?;

    Ok(Json(UpdateProfileResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
        admin: ProfileBody::from_entity(&output.admin),
        updated_fields: output.updated_fields,
    }))
}

fn client_info(headers: &HeaderMap, addr: SocketAddr) -> ClientInfo {
    extract_client_info(headers, Some(addr.ip()))
}

/// Missing or malformed request bodies go through the normal error
/// envelope (400 with a validation code), not axum's plain-text 422.
fn reject_bad_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<Json<T>, AuthError> {
    body.map_err(|rejection| AuthError::Validation(rejection.body_text()))
}

fn attach_token_cookies(response: &mut Response, config: &AuthConfig, tokens: &TokenPair) {
    response.headers_mut().append(
        header::SET_COOKIE,
        set_cookie_header(&config.access_cookie(), &tokens.access_token),
    );
    response.headers_mut().append(
        header::SET_COOKIE,
        set_cookie_header(&config.refresh_cookie(), &tokens.refresh_token),
    );
}
