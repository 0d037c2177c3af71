//! Auth Configuration
//!
//! Runtime configuration for token signing, cookie attributes, and the
//! brute-force lockout. Built once at startup and shared via the app
//! state; missing secrets fail startup rather than individual requests.

use platform::cookie::{CookieConfig, SameSite};
use platform::lockout::LockoutPolicy;

use crate::error::{AuthError, AuthResult};

/// Default access-token lifetime (seconds)
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Default refresh-token lifetime (seconds)
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Auth runtime configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub access_secret: String,
    /// HMAC secret for refresh tokens. Distinct from the access secret so
    /// one token kind can never validate as the other.
    pub refresh_secret: String,
    /// Optional issuer claim, validated on verification when set
    pub issuer: Option<String>,
    /// Access-token lifetime in seconds
    pub access_ttl_secs: i64,
    /// Refresh-token lifetime in seconds
    pub refresh_ttl_secs: i64,
    /// Brute-force lockout policy
    pub lockout: LockoutPolicy,
    /// Cookie Secure attribute
    pub cookie_secure: bool,
    /// Cookie SameSite attribute
    pub cookie_same_site: SameSite,
    /// Optional cookie Domain attribute
    pub cookie_domain: Option<String>,
    /// Access-token cookie name
    pub access_cookie_name: String,
    /// Refresh-token cookie name
    pub refresh_cookie_name: String,
}

impl AuthConfig {
    /// Build from environment variables.
    ///
    /// `JWT_SECRET` and `JWT_REFRESH_SECRET` are required; everything else
    /// has defaults. Production cookie attributes (Secure, SameSite=Strict)
    /// are selected when `APP_ENV=production`.
    pub fn from_env() -> AuthResult<Self> {
        let access_secret = require_env("JWT_SECRET")?;
        let refresh_secret = require_env("JWT_REFRESH_SECRET")?;

        let issuer = std::env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty());

        let access_ttl_secs = env_i64("JWT_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL_SECS);
        let refresh_ttl_secs = env_i64("JWT_REFRESH_TTL_SECS", DEFAULT_REFRESH_TTL_SECS);

        let production = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let cookie_domain = std::env::var("COOKIE_DOMAIN")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            access_secret,
            refresh_secret,
            issuer,
            access_ttl_secs,
            refresh_ttl_secs,
            lockout: LockoutPolicy::default(),
            cookie_secure: production,
            cookie_same_site: if production {
                SameSite::Strict
            } else {
                SameSite::Lax
            },
            cookie_domain,
            access_cookie_name: "access_token".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
        })
    }

    /// Local-development configuration with ephemeral random secrets.
    ///
    /// Tokens do not survive a restart; acceptable for development only.
    pub fn development() -> Self {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let random_secret = |rng: &mut rand::rngs::ThreadRng| -> String {
            (0..64)
                .map(|_| {
                    let b: u8 = rng.gen_range(0..62);
                    match b {
                        0..=9 => (b'0' + b) as char,
                        10..=35 => (b'a' + b - 10) as char,
                        _ => (b'A' + b - 36) as char,
                    }
                })
                .collect()
        };

        Self {
            access_secret: random_secret(&mut rng),
            refresh_secret: random_secret(&mut rng),
            issuer: None,
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
            lockout: LockoutPolicy::default(),
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            cookie_domain: None,
            access_cookie_name: "access_token".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
        }
    }

    /// Access-token TTL as a chrono duration
    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_ttl_secs)
    }

    /// Refresh-token TTL as a chrono duration
    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_ttl_secs)
    }

    /// Cookie configuration for the access token
    pub fn access_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.access_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            domain: self.cookie_domain.clone(),
            max_age_secs: Some(self.access_ttl_secs),
        }
    }

    /// Cookie configuration for the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            domain: self.cookie_domain.clone(),
            max_age_secs: Some(self.refresh_ttl_secs),
        }
    }
}

fn require_env(name: &str) -> AuthResult<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AuthError::Configuration(format!(
            "{name} environment variable is not set"
        ))),
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config_has_distinct_secrets() {
        let config = AuthConfig::development();
        assert_ne!(config.access_secret, config.refresh_secret);
        assert_eq!(config.access_secret.len(), 64);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_cookie_configs_carry_ttls() {
        let config = AuthConfig::development();
        assert_eq!(
            config.access_cookie().max_age_secs,
            Some(DEFAULT_ACCESS_TTL_SECS)
        );
        assert_eq!(
            config.refresh_cookie().max_age_secs,
            Some(DEFAULT_REFRESH_TTL_SECS)
        );
        assert_eq!(config.access_cookie().name, "access_token");
        assert_eq!(config.refresh_cookie().name, "refresh_token");
    }
}
