//! Request/Response DTOs
//!
//! Wire shapes for the auth endpoints. Field names are camelCase on the
//! wire; the password hash never appears in any response type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::admin::{ADMIN_ROLE, Admin};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Admin summary embedded in the login response
#[derive(Debug, Serialize)]
pub struct AdminSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
}

impl AdminSummary {
    pub fn from_entity(admin: &Admin) -> Self {
        Self {
            id: admin.admin_id.to_string(),
            username: admin.username.original().to_string(),
            email: admin.email.as_str().to_string(),
            last_login: admin.last_login_at,
        }
    }
}

/// Login response body
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub admin: AdminSummary,
}

/// Refresh response body
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Generic success envelope
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Logout-all response body
#[derive(Debug, Serialize)]
pub struct LogoutAllResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "sessionsTerminated")]
    pub sessions_terminated: u64,
}

/// Authenticated principal echoed by the verify endpoint
#[derive(Debug, Serialize)]
pub struct VerifiedUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

/// Verify response body
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: VerifiedUser,
}

/// Profile response body
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub admin: ProfileBody,
}

#[derive(Debug, Serialize)]
pub struct ProfileBody {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ProfileBody {
    pub fn from_entity(admin: &Admin) -> Self {
        Self {
            id: admin.admin_id.to_string(),
            username: admin.username.original().to_string(),
            email: admin.email.as_str().to_string(),
            role: ADMIN_ROLE.to_string(),
            last_login: admin.last_login_at,
            created_at: admin.created_at,
        }
    }
}

/// Profile update request body
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// Profile update response body
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub message: String,
    pub admin: ProfileBody,
    #[serde(rename = "updatedFields")]
    pub updated_fields: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, username::Username};
    use platform::password::HashedPassword;

    #[test]
    fn test_admin_summary_has_no_password_material() {
        let admin = Admin::new(
            Username::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            HashedPassword::from_phc("$argon2id$secret-material".to_string()),
        );

        let json = serde_json::to_string(&AdminSummary::from_entity(&admin)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"lastLogin\":null"));
    }

    #[test]
    fn test_profile_body_uses_camel_case() {
        let admin = Admin::new(
            Username::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            HashedPassword::from_phc("$argon2id$x".to_string()),
        );

        let json = serde_json::to_string(&ProfileBody::from_entity(&admin)).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"lastLogin\""));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
