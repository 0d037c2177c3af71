//! Admin Entity
//!
//! The administrator account. A handful of rows at most; there is no
//! self-registration, accounts are created by the bootstrap tool.
//! Deactivation is a flag flip, never a row delete.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{admin_id::AdminId, email::Email, username::Username};

/// Role claim stamped into access tokens
pub const ADMIN_ROLE: &str = "admin";

/// Administrator entity
///
/// The password hash lives here but is never serialized to clients;
/// response DTOs are built from the other fields only.
#[derive(Debug, Clone)]
pub struct Admin {
    /// Internal UUID identifier
    pub admin_id: AdminId,
    /// Username (unique case-insensitively, for login and display)
    pub username: Username,
    /// Email (unique, lowercased)
    pub email: Email,
    /// Argon2id password hash (PHC string)
    pub password_hash: HashedPassword,
    /// Whether the account may log in
    pub is_active: bool,
    /// Version stamped into refresh-token claims
    pub token_version: i32,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Create a new administrator
    pub fn new(username: Username, email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            admin_id: AdminId::new(),
            username,
            email,
            password_hash,
            is_active: true,
            token_version: 1,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Check if the account may log in
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Update username
    pub fn set_username(&mut self, username: Username) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    /// Update email
    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Replace the password hash
    pub fn set_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Disable login without deleting the row
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn sample_admin() -> Admin {
        let hash = ClearTextPassword::new("a sufficiently long pw".to_string())
            .unwrap()
            .hash()
            .unwrap();
        Admin::new(
            Username::new("admin").unwrap(),
            Email::new("admin@example.com").unwrap(),
            hash,
        )
    }

    #[test]
    fn test_new_admin_is_active_with_no_login() {
        let admin = sample_admin();
        assert!(admin.can_login());
        assert!(admin.last_login_at.is_none());
        assert_eq!(admin.token_version, 1);
    }

    #[test]
    fn test_record_login_touches_timestamps() {
        let mut admin = sample_admin();
        admin.record_login();
        assert!(admin.last_login_at.is_some());
        assert!(admin.updated_at >= admin.created_at);
    }

    #[test]
    fn test_deactivate_blocks_login() {
        let mut admin = sample_admin();
        admin.deactivate();
        assert!(!admin.can_login());
    }
}
