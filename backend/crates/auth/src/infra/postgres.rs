//! PostgreSQL Repository Implementation
//!
//! Implements all three stores against one pool. Expiry is enforced at
//! read time (expired rows are filtered out of lookups) in addition to
//! the periodic sweep, so a missed sweep never extends a session or a
//! lockout.

use chrono::{DateTime, Utc};
use platform::lockout::LockoutPolicy;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    admin::Admin, failed_attempt::FailedAttempt, refresh_session::RefreshSession,
};
use crate::domain::repository::{
    AdminRepository, FailedAttemptRepository, RefreshSessionRepository,
};
use crate::domain::value_object::{admin_id::AdminId, email::Email, username::Username};
use crate::error::AuthResult;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
    lockout: LockoutPolicy,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lockout: LockoutPolicy::default(),
        }
    }

    pub fn with_lockout(pool: PgPool, lockout: LockoutPolicy) -> Self {
        Self { pool, lockout }
    }

    fn attempt_cutoff(&self) -> DateTime<Utc> {
        Utc::now() - chrono::Duration::milliseconds(self.lockout.retention_ms())
    }

    /// Reap expired refresh sessions (startup and interval sweep)
    pub async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Reap failed-attempt records past their retention
    pub async fn cleanup_expired_attempts(&self) -> AuthResult<u64> {
        let result = sqlx::query("DELETE FROM failed_attempts WHERE created_at <= $1")
            .bind(self.attempt_cutoff())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    is_active: bool,
    token_version: i32,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminRow {
    fn into_entity(self) -> Admin {
        Admin {
            admin_id: AdminId::from_uuid(self.id),
            username: Username::from_db(&self.username),
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_phc(self.password_hash),
            is_active: self.is_active,
            token_version: self.token_version,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl AdminRepository for PgAuthRepository {
    async fn create(&self, admin: &Admin) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (
                id,
                username,
                username_canonical,
                email,
                password_hash,
                is_active,
                token_version,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(admin.admin_id.as_uuid())
        .bind(admin.username.original())
        .bind(admin.username.canonical())
        .bind(admin.email.as_str())
        .bind(admin.password_hash.as_str())
        .bind(admin.is_active)
        .bind(admin.token_version)
        .bind(admin.last_login_at)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, admin_id: &AdminId) -> AuthResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password_hash,
                is_active,
                token_version,
                last_login_at,
                created_at,
                updated_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(admin_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AdminRow::into_entity))
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password_hash,
                is_active,
                token_version,
                last_login_at,
                created_at,
                updated_at
            FROM admins
            WHERE username_canonical = $1
            "#,
        )
        .bind(username.canonical())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AdminRow::into_entity))
    }

    async fn username_taken(&self, username: &Username, exclude: &AdminId) -> AuthResult<bool> {
        let taken: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM admins WHERE username_canonical = $1 AND id <> $2",
        )
        .bind(username.canonical())
        .bind(exclude.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(taken.is_some())
    }

    async fn email_taken(&self, email: &Email, exclude: &AdminId) -> AuthResult<bool> {
        let taken: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM admins WHERE email = $1 AND id <> $2")
                .bind(email.as_str())
                .bind(exclude.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        Ok(taken.is_some())
    }

    async fn update(&self, admin: &Admin) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE admins SET
                username = $2,
                username_canonical = $3,
                email = $4,
                password_hash = $5,
                is_active = $6,
                token_version = $7,
                last_login_at = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(admin.admin_id.as_uuid())
        .bind(admin.username.original())
        .bind(admin.username.canonical())
        .bind(admin.email.as_str())
        .bind(admin.password_hash.as_str())
        .bind(admin.is_active)
        .bind(admin.token_version)
        .bind(admin.last_login_at)
        .bind(admin.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct FailedAttemptRow {
    ip: String,
    count: i32,
    last_attempt_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl FailedAttemptRow {
    fn into_entity(self) -> FailedAttempt {
        FailedAttempt {
            ip: self.ip,
            count: self.count.max(0) as u32,
            last_attempt_at: self.last_attempt_at,
            created_at: self.created_at,
        }
    }
}

impl FailedAttemptRepository for PgAuthRepository {
    async fn find_by_ip(&self, ip: &str) -> AuthResult<Option<FailedAttempt>> {
        let row = sqlx::query_as::<_, FailedAttemptRow>(
            r#"
            SELECT ip, count, last_attempt_at, created_at
            FROM failed_attempts
            WHERE ip = $1 AND created_at > $2
            "#,
        )
        .bind(ip)
        .bind(self.attempt_cutoff())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FailedAttemptRow::into_entity))
    }

    async fn record_failure(&self, ip: &str) -> AuthResult<()> {
        // Single statement so concurrent failures from one address cannot
        // lose increments.
        sqlx::query(
            r#"
            INSERT INTO failed_attempts (ip, count, last_attempt_at, created_at)
            VALUES ($1, 1, NOW(), NOW())
            ON CONFLICT (ip) DO UPDATE SET
                count = failed_attempts.count + 1,
                last_attempt_at = NOW()
            "#,
        )
        .bind(ip)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear(&self, ip: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM failed_attempts WHERE ip = $1")
            .bind(ip)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.cleanup_expired_attempts().await
    }
}

#[derive(sqlx::FromRow)]
struct RefreshSessionRow {
    token: String,
    admin_id: Uuid,
    ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl RefreshSessionRow {
    fn into_entity(self) -> RefreshSession {
        RefreshSession {
            token: self.token,
            admin_id: AdminId::from_uuid(self.admin_id),
            ip: self.ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

impl RefreshSessionRepository for PgAuthRepository {
    async fn create(&self, session: &RefreshSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_sessions (
                token,
                admin_id,
                ip,
                user_agent,
                created_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&session.token)
        .bind(session.admin_id.as_uuid())
        .bind(&session.ip)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshSession>> {
        let row = sqlx::query_as::<_, RefreshSessionRow>(
            r#"
            SELECT token, admin_id, ip, user_agent, created_at, expires_at
            FROM refresh_sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshSessionRow::into_entity))
    }

    async fn delete_by_token(&self, token: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM refresh_sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_for_admin(&self, admin_id: &AdminId) -> AuthResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_sessions WHERE admin_id = $1")
            .bind(admin_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_for_admin(&self, admin_id: &AdminId) -> AuthResult<u64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM refresh_sessions
            WHERE admin_id = $1 AND expires_at > NOW()
            "#,
        )
        .bind(admin_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.cleanup_expired_sessions().await
    }
}
