//! Auth Middleware
//!
//! Access-token verification for protected routes. Accepts the token from
//! the cookie or an Authorization bearer header (cookie wins). On an
//! invalid token both auth cookies are cleared so a broken client stops
//! retrying with dead credentials.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::cookie::{delete_cookie_header, extract_cookie};

use crate::application::config::AuthConfig;
use crate::application::tokens::{TokenIssuer, TokenKind};
use crate::domain::entity::admin::ADMIN_ROLE;
use crate::error::AuthError;

/// Seconds of remaining validity below which the expiry-warning header is set
const EXPIRY_WARNING_SECS: i64 = 5 * 60;

/// Response header telling clients the access token is about to expire
pub const TOKEN_EXPIRY_SOON_HEADER: &str = "x-token-expiry-soon";

/// Authenticated principal, inserted as a request extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

/// State shared by the auth middleware
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub config: AuthConfig,
    pub issuer: TokenIssuer,
}

/// Verify the access token and attach the principal to the request.
///
/// Missing token is 401 (the client should log in); a present but bad
/// token is 403 with cleared cookies (the client should stop using it).
pub async fn require_auth(
    State(state): State<AuthMiddlewareState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_or_cookie(request.headers(), &state.config) {
        Some(token) => token,
        None => return AuthError::MissingToken.into_response(),
    };

    let claims = match state.issuer.verify(&token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(e) => {
            let err: AuthError = e.into();
            let mut response = err.into_response();
            clear_auth_cookies(response.headers_mut(), &state.config);
            return response;
        }
    };

    let expires_in = claims.exp - chrono::Utc::now().timestamp();

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
        role: claims.role.unwrap_or_default(),
    });

    let mut response = next.run(request).await;

    if expires_in < EXPIRY_WARNING_SECS {
        response
            .headers_mut()
            .insert(TOKEN_EXPIRY_SOON_HEADER, HeaderValue::from_static("true"));
    }

    response
}

/// Reject authenticated principals lacking the admin role.
///
/// Runs after `require_auth`; a missing extension means the route was
/// wired without it, which is treated as unauthenticated.
pub async fn require_admin(request: Request, next: Next) -> Response {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.role == ADMIN_ROLE => next.run(request).await,
        Some(_) => AuthError::Forbidden.into_response(),
        None => AuthError::MissingToken.into_response(),
    }
}

/// Token from the auth cookie, else the Authorization bearer header
fn bearer_or_cookie(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    if let Some(token) = extract_cookie(headers, &config.access_cookie_name) {
        if !token.is_empty() {
            return Some(token);
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Append delete headers for both auth cookies
pub fn clear_auth_cookies(headers: &mut HeaderMap, config: &AuthConfig) {
    headers.append(
        header::SET_COOKIE,
        delete_cookie_header(&config.access_cookie()),
    );
    headers.append(
        header::SET_COOKIE,
        delete_cookie_header(&config.refresh_cookie()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_or_cookie_prefers_cookie() {
        let config = AuthConfig::development();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("access_token=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(
            bearer_or_cookie(&headers, &config).as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn test_bearer_fallback() {
        let config = AuthConfig::development();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(
            bearer_or_cookie(&headers, &config).as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_no_token_sources() {
        let config = AuthConfig::development();
        let headers = HeaderMap::new();
        assert!(bearer_or_cookie(&headers, &config).is_none());

        let mut malformed = HeaderMap::new();
        malformed.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_or_cookie(&malformed, &config).is_none());
    }

    #[test]
    fn test_clear_auth_cookies_sets_both() {
        let config = AuthConfig::development();
        let mut headers = HeaderMap::new();
        clear_auth_cookies(&mut headers, &config);

        let cookies: Vec<_> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();

        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
        assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }
}
