//! Username Value Object
//!
//! Login and display name for an administrator. Uniqueness is
//! case-insensitive: the canonical (lowercased) form is what gets the
//! unique index.

use std::fmt;
use thiserror::Error;

/// Minimum username length
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("Username must be at least {MIN_USERNAME_LENGTH} characters long")]
    TooShort,

    #[error("Username cannot exceed {MAX_USERNAME_LENGTH} characters")]
    TooLong,

    #[error("Username may only contain letters, digits, '.', '_' and '-'")]
    InvalidCharacter,
}

/// Validated administrator username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username {
    original: String,
    canonical: String,
}

impl Username {
    /// Create a validated username. Input is trimmed first.
    pub fn new(raw: &str) -> Result<Self, UsernameError> {
        let trimmed = raw.trim();

        let char_count = trimmed.chars().count();
        if char_count < MIN_USERNAME_LENGTH {
            return Err(UsernameError::TooShort);
        }
        if char_count > MAX_USERNAME_LENGTH {
            return Err(UsernameError::TooLong);
        }

        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self {
            original: trimmed.to_string(),
            canonical: trimmed.to_ascii_lowercase(),
        })
    }

    /// Rebuild from a stored value without re-validation.
    ///
    /// Stored rows may predate the current policy; loading them must not
    /// fail.
    pub fn from_db(stored: &str) -> Self {
        Self {
            original: stored.to_string(),
            canonical: stored.to_ascii_lowercase(),
        }
    }

    /// As entered (for display)
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercased form used for uniqueness and lookup
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
