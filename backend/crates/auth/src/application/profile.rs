//! Profile Use Case
//!
//! Read and update the authenticated administrator's own record. Password
//! changes require the current password; username and email changes check
//! uniqueness against other accounts before writing.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::admin::Admin;
use crate::domain::repository::AdminRepository;
use crate::domain::value_object::{admin_id::AdminId, email::Email, username::Username};
use crate::error::{AuthError, AuthResult};

/// Requested profile mutations; absent fields are left untouched
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Profile update result: the fresh entity plus which fields changed
#[derive(Debug)]
pub struct ProfileUpdateOutput {
    pub admin: Admin,
    pub updated_fields: Vec<&'static str>,
}

/// Profile use case
pub struct ProfileUseCase<A>
where
    A: AdminRepository,
{
    admins: Arc<A>,
}

impl<A> ProfileUseCase<A>
where
    A: AdminRepository,
{
    pub fn new(admins: Arc<A>) -> Self {
        Self { admins }
    }

    /// Fetch the administrator's own record
    pub async fn get(&self, admin_id: &AdminId) -> AuthResult<Admin> {
        self.admins
            .find_by_id(admin_id)
            .await?
            .ok_or(AuthError::AdminNotFound)
    }

    /// Apply requested mutations.
    ///
    /// All requested fields are validated before anything is written, so a
    /// rejected update leaves the record untouched.
    pub async fn update(
        &self,
        admin_id: &AdminId,
        update: ProfileUpdate,
    ) -> AuthResult<ProfileUpdateOutput> {
        let mut admin = self.get(admin_id).await?;
        let mut updated_fields: Vec<&'static str> = Vec::new();

        let new_username = match update.username.as_deref() {
            Some(raw) if raw.trim() != admin.username.original() => {
                let parsed = Username::new(raw)
                    .map_err(|e| AuthError::Validation(e.to_string()))?;
                if self.admins.username_taken(&parsed, admin_id).await? {
                    return Err(AuthError::DuplicateUsername);
                }
                Some(parsed)
            }
            _ => None,
        };

        let new_email = match update.email.as_deref() {
            Some(raw) if !raw.trim().eq_ignore_ascii_case(admin.email.as_str()) => {
                let parsed =
                    Email::new(raw).map_err(|e| AuthError::Validation(e.to_string()))?;
                if self.admins.email_taken(&parsed, admin_id).await? {
                    return Err(AuthError::DuplicateEmail);
                }
                Some(parsed)
            }
            _ => None,
        };

        let new_hash = match update.new_password.as_deref() {
            Some(raw) => {
                let current = update
                    .current_password
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| {
                        AuthError::Validation(
                            "Current password is required to set a new password".to_string(),
                        )
                    })?;

                let candidate = ClearTextPassword::new_unchecked(current.to_string());
                if !admin.password_hash.verify(&candidate)? {
                    return Err(AuthError::InvalidPassword);
                }

                let validated = ClearTextPassword::new(raw.to_string())
                    .map_err(|e| AuthError::Validation(e.to_string()))?;
                Some(validated.hash()?)
            }
            None => None,
        };

        if let Some(username) = new_username {
            admin.set_username(username);
            updated_fields.push("username");
        }
        if let Some(email) = new_email {
            admin.set_email(email);
            updated_fields.push("email");
        }
        if let Some(hash) = new_hash {
            admin.set_password(hash);
            updated_fields.push("password");
        }

        if updated_fields.is_empty() {
            return Err(AuthError::Validation(
                "No profile changes were provided".to_string(),
            ));
        }

        self.admins.update(&admin).await?;

        tracing::info!(
            admin_id = %admin_id,
            fields = ?updated_fields,
            "Admin profile updated"
        );

        Ok(ProfileUpdateOutput {
            admin,
            updated_fields,
        })
    }
}
