//! Refresh Session Entity
//!
//! Persisted record for one issued refresh token. The token string itself
//! is the key; a token maps to at most one live record. Single-use:
//! rotation deletes this record and writes a fresh one.

use chrono::{DateTime, Duration, Utc};
use platform::client::ClientInfo;

use crate::domain::value_object::admin_id::AdminId;

/// Stored refresh-token record
#[derive(Debug, Clone)]
pub struct RefreshSession {
    /// The signed refresh token (unique)
    pub token: String,
    /// Owning administrator (weak reference, by id only)
    pub admin_id: AdminId,
    /// Source address at issuance
    pub ip: Option<String>,
    /// Client agent string at issuance
    pub user_agent: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Expiry; rows past this are invalid even before the sweep removes them
    pub expires_at: DateTime<Utc>,
}

impl RefreshSession {
    /// Create a new session record
    ///
    /// TTL is provided by the application layer (config), not hard-coded
    /// here.
    pub fn new(token: String, admin_id: AdminId, client: &ClientInfo, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            token,
            admin_id,
            ip: client.ip_string(),
            user_agent: client.user_agent.clone(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Check if the record has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClientInfo {
        ClientInfo::new("203.0.113.7".parse().ok(), Some("TestAgent/1.0".into()))
    }

    #[test]
    fn test_new_session_is_live() {
        let session = RefreshSession::new(
            "token-value".to_string(),
            AdminId::new(),
            &client(),
            Duration::days(7),
        );
        assert!(!session.is_expired());
        assert_eq!(session.ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(session.user_agent.as_deref(), Some("TestAgent/1.0"));
    }

    #[test]
    fn test_expiry() {
        let mut session = RefreshSession::new(
            "token-value".to_string(),
            AdminId::new(),
            &client(),
            Duration::days(7),
        );
        session.expires_at = Utc::now() - Duration::seconds(1);
        assert!(session.is_expired());
    }
}
