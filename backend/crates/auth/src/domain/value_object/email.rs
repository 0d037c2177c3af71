//! Email Value Object
//!
//! Stored lowercased; uniqueness is enforced on the stored form.

use std::fmt;
use thiserror::Error;

/// RFC 5321 practical ceiling
pub const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Please enter a valid email")]
    InvalidFormat,

    #[error("Email cannot exceed {MAX_EMAIL_LENGTH} characters")]
    TooLong,
}

/// Validated administrator email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Create a validated, lowercased email address.
    ///
    /// Intentionally a shallow structural check (one `@`, non-empty local
    /// part, dotted domain, no whitespace) rather than a full RFC parse.
    pub fn new(raw: &str) -> Result<Self, EmailError> {
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong);
        }
        if normalized.chars().any(|c| c.is_whitespace()) {
            return Err(EmailError::InvalidFormat);
        }

        let (local, domain) = normalized.split_once('@').ok_or(EmailError::InvalidFormat)?;

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailError::InvalidFormat);
        }

        // Domain needs at least one dot with non-empty labels
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(normalized))
    }

    /// Rebuild from a stored value without re-validation.
    pub fn from_db(stored: String) -> Self {
        Self(stored)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_is_lowercased() {
        let email = Email::new(" Admin@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "admin@example.com");
    }

    #[test]
    fn test_rejects_missing_at() {
        assert_eq!(
            Email::new("adminexample.com").unwrap_err(),
            EmailError::InvalidFormat
        );
    }

    #[test]
    fn test_rejects_bad_domain() {
        assert!(Email::new("admin@nodot").is_err());
        assert!(Email::new("admin@.example.com").is_err());
        assert!(Email::new("admin@example.").is_err());
        assert!(Email::new("@example.com").is_err());
    }

    #[test]
    fn test_rejects_whitespace_inside() {
        assert!(Email::new("admin user@example.com").is_err());
    }
}
