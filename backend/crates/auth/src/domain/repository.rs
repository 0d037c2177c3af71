//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer. Store handles are constructed at startup and
//! injected; nothing here is ambient or module-global.

use crate::domain::entity::{
    admin::Admin, failed_attempt::FailedAttempt, refresh_session::RefreshSession,
};
use crate::domain::value_object::{admin_id::AdminId, email::Email, username::Username};
use crate::error::AuthResult;

/// Credential store: administrator records
#[trait_variant::make(AdminRepository: Send)]
pub trait LocalAdminRepository {
    /// Create a new administrator (bootstrap path)
    async fn create(&self, admin: &Admin) -> AuthResult<()>;

    /// Find administrator by ID
    async fn find_by_id(&self, admin_id: &AdminId) -> AuthResult<Option<Admin>>;

    /// Find administrator by username (canonical, case-insensitive)
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<Admin>>;

    /// Check if a username is taken by a different administrator
    async fn username_taken(&self, username: &Username, exclude: &AdminId) -> AuthResult<bool>;

    /// Check if an email is taken by a different administrator
    async fn email_taken(&self, email: &Email, exclude: &AdminId) -> AuthResult<bool>;

    /// Persist entity mutations (last login, profile fields, ...)
    async fn update(&self, admin: &Admin) -> AuthResult<()>;
}

/// Failure tracker: per-address brute-force counters
#[trait_variant::make(FailedAttemptRepository: Send)]
pub trait LocalFailedAttemptRepository {
    /// Find the record for an address. Records past their retention are
    /// treated as absent even if not yet reaped.
    async fn find_by_ip(&self, ip: &str) -> AuthResult<Option<FailedAttempt>>;

    /// Record a failure: create with count=1, or atomically increment and
    /// refresh the last-attempt time. Concurrent callers must not lose
    /// increments.
    async fn record_failure(&self, ip: &str) -> AuthResult<()>;

    /// Delete the record unconditionally
    async fn clear(&self, ip: &str) -> AuthResult<()>;

    /// Reap records past their retention
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Session store: persisted refresh-token records
#[trait_variant::make(RefreshSessionRepository: Send)]
pub trait LocalRefreshSessionRepository {
    /// Persist a new session record
    async fn create(&self, session: &RefreshSession) -> AuthResult<()>;

    /// Find a live (unexpired) record by token value
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshSession>>;

    /// Delete one record by token value (no-op when absent)
    async fn delete_by_token(&self, token: &str) -> AuthResult<()>;

    /// Delete all records for one administrator, returning the count
    async fn delete_all_for_admin(&self, admin_id: &AdminId) -> AuthResult<u64>;

    /// Count live records for one administrator
    async fn count_for_admin(&self, admin_id: &AdminId) -> AuthResult<u64>;

    /// Reap expired records
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
