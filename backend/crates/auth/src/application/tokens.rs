//! Token Issuance and Verification
//!
//! Stateless signed tokens (HS256). Access and refresh tokens are signed
//! with distinct secrets and carry a `type` claim; a token of one kind can
//! never validate as the other, even if both reach the same verifier.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::domain::entity::admin::{ADMIN_ROLE, Admin};
use crate::error::{AuthError, AuthResult};

/// Token kind, carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Token verification failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// No token was presented
    #[error("token missing")]
    Missing,
    /// Signature, structure, or claim validation failed
    #[error("token invalid")]
    Invalid,
    /// Token is structurally valid but past its expiry
    #[error("token expired")]
    Expired,
    /// Valid signature but the `type` claim names the other kind
    #[error("wrong token type")]
    WrongType,
}

/// Signed token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin ID
    pub sub: String,
    /// Unique token id. Makes every minted token distinct even when two
    /// mints land on the same second, so the stored token string stays a
    /// usable unique key.
    pub jti: String,
    /// Username at issuance
    pub username: String,
    /// Role; present on access tokens only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Token kind discriminator
    #[serde(rename = "type")]
    pub token_type: TokenKind,
    /// Admin token generation; present on refresh tokens only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_version: Option<i32>,
    /// Issuer, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Access/refresh token pair minted together at login or rotation
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies tokens using the configured secrets
#[derive(Clone)]
pub struct TokenIssuer {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_decoding: DecodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    issuer: Option<String>,
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    ///
    /// Empty secrets are a deployment fault and fail construction.
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        if config.access_secret.trim().is_empty() {
            return Err(AuthError::Configuration(
                "access token secret is empty".to_string(),
            ));
        }
        if config.refresh_secret.trim().is_empty() {
            return Err(AuthError::Configuration(
                "refresh token secret is empty".to_string(),
            ));
        }

        Ok(Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
            issuer: config.issuer.clone(),
        })
    }

    /// Mint a fresh access/refresh pair for an administrator
    pub fn mint(&self, admin: &Admin) -> AuthResult<TokenPair> {
        let now = Utc::now().timestamp();

        let access = Claims {
            sub: admin.admin_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            username: admin.username.original().to_string(),
            role: Some(ADMIN_ROLE.to_string()),
            token_type: TokenKind::Access,
            token_version: None,
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.access_ttl_secs,
        };

        let refresh = Claims {
            sub: admin.admin_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            username: admin.username.original().to_string(),
            role: None,
            token_type: TokenKind::Refresh,
            token_version: Some(admin.token_version),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.refresh_ttl_secs,
        };

        Ok(TokenPair {
            access_token: self.sign(&access, TokenKind::Access)?,
            refresh_token: self.sign(&refresh, TokenKind::Refresh)?,
        })
    }

    /// Verify a token and check it is of the expected kind.
    ///
    /// Signature and expiry are checked before the `type` claim: a token
    /// signed with the wrong secret is `Invalid`, not `WrongType`.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let key = match expected {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        match &self.issuer {
            Some(iss) => validation.set_issuer(&[iss]),
            None => {
                validation.iss = None;
            }
        }

        let data = jsonwebtoken::decode::<Claims>(token, key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if data.claims.token_type != expected {
            return Err(TokenError::WrongType);
        }

        Ok(data.claims)
    }

    fn sign(&self, claims: &Claims, kind: TokenKind) -> AuthResult<String> {
        let key = match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, username::Username};
    use platform::password::HashedPassword;

    fn test_admin() -> Admin {
        Admin::new(
            Username::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            HashedPassword::from_phc("$argon2id$stub".to_string()),
        )
    }

    fn config() -> AuthConfig {
        let mut config = AuthConfig::development();
        config.access_secret = "access-secret-for-tests".to_string();
        config.refresh_secret = "refresh-secret-for-tests".to_string();
        config
    }

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let issuer = TokenIssuer::new(&config()).unwrap();
        let admin = test_admin();
        let pair = issuer.mint(&admin).unwrap();

        let access = issuer.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.sub, admin.admin_id.to_string());
        assert_eq!(access.username, "alice");
        assert_eq!(access.role.as_deref(), Some(ADMIN_ROLE));
        assert_eq!(access.token_type, TokenKind::Access);
        assert!(access.token_version.is_none());

        let refresh = issuer
            .verify(&pair.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(refresh.token_type, TokenKind::Refresh);
        assert_eq!(refresh.token_version, Some(admin.token_version));
        assert!(refresh.role.is_none());
    }

    #[test]
    fn test_back_to_back_mints_are_distinct() {
        // Both mints land within the same second, so only the jti keeps
        // the token strings apart. Identical refresh tokens would collide
        // on the stored token key and make rotation a no-op.
        let issuer = TokenIssuer::new(&config()).unwrap();
        let admin = test_admin();

        let first = issuer.mint(&admin).unwrap();
        let second = issuer.mint(&admin).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);

        let a = issuer.verify(&first.refresh_token, TokenKind::Refresh).unwrap();
        let b = issuer
            .verify(&second.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_cross_kind_fails_on_signature() {
        // Distinct secrets: the wrong kind fails signature validation
        // before the type claim is ever consulted.
        let issuer = TokenIssuer::new(&config()).unwrap();
        let pair = issuer.mint(&test_admin()).unwrap();

        assert_eq!(
            issuer.verify(&pair.refresh_token, TokenKind::Access),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            issuer.verify(&pair.access_token, TokenKind::Refresh),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_type_claim_catches_shared_secret() {
        // With identical secrets the signature passes, so the type claim
        // is the last line of defense.
        let mut config = config();
        config.refresh_secret = config.access_secret.clone();
        let issuer = TokenIssuer::new(&config).unwrap();
        let pair = issuer.mint(&test_admin()).unwrap();

        assert_eq!(
            issuer.verify(&pair.refresh_token, TokenKind::Access),
            Err(TokenError::WrongType)
        );
    }

    #[test]
    fn test_expired_token() {
        let config = config();
        let issuer = TokenIssuer::new(&config).unwrap();
        let admin = test_admin();

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: admin.admin_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            username: "alice".to_string(),
            role: Some(ADMIN_ROLE.to_string()),
            token_type: TokenKind::Access,
            token_version: None,
            iss: None,
            iat: now - 120,
            exp: now - 60,
        };
        let token = issuer.sign(&claims, TokenKind::Access).unwrap();

        assert_eq!(
            issuer.verify(&token, TokenKind::Access),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let issuer = TokenIssuer::new(&config()).unwrap();
        let pair = issuer.mint(&test_admin()).unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.pop();
        tampered.push('x');

        assert_eq!(
            issuer.verify(&tampered, TokenKind::Access),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            issuer.verify("not-a-token", TokenKind::Access),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_empty_token_is_missing() {
        let issuer = TokenIssuer::new(&config()).unwrap();
        assert_eq!(
            issuer.verify("", TokenKind::Access),
            Err(TokenError::Missing)
        );
    }

    #[test]
    fn test_empty_secret_is_a_config_error() {
        let mut config = config();
        config.access_secret = "  ".to_string();
        assert!(matches!(
            TokenIssuer::new(&config),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_issuer_claim_is_validated() {
        let mut config = config();
        config.issuer = Some("admin-api".to_string());
        let issuer = TokenIssuer::new(&config).unwrap();
        let pair = issuer.mint(&test_admin()).unwrap();

        let claims = issuer.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.iss.as_deref(), Some("admin-api"));

        let mut other = config.clone();
        other.issuer = Some("some-other-service".to_string());
        let other_issuer = TokenIssuer::new(&other).unwrap();
        assert_eq!(
            other_issuer.verify(&pair.access_token, TokenKind::Access),
            Err(TokenError::Invalid)
        );
    }
}
