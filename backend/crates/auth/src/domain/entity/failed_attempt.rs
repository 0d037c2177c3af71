//! Failed Attempt Entity
//!
//! Per-source-address failure counter backing the brute-force lockout.
//! One record per address. The lockout is address-scoped, not
//! account-scoped: it slows credential stuffing, and the tradeoff that a
//! shared address can be locked by a noisy neighbor is accepted.

use chrono::{DateTime, Utc};
use platform::lockout::LockoutPolicy;

/// Failed login attempts from one source address
#[derive(Debug, Clone)]
pub struct FailedAttempt {
    /// Source address (lockout key)
    pub ip: String,
    /// Failures accumulated within the record's lifetime
    pub count: u32,
    /// Time of the most recent failure
    pub last_attempt_at: DateTime<Utc>,
    /// Record creation time; absolute retention is measured from here
    pub created_at: DateTime<Utc>,
}

impl FailedAttempt {
    /// Create a record for a first failure
    pub fn new(ip: String) -> Self {
        let now = Utc::now();
        Self {
            ip,
            count: 1,
            last_attempt_at: now,
            created_at: now,
        }
    }

    /// Record another failure
    pub fn record_failure(&mut self) {
        self.count += 1;
        self.last_attempt_at = Utc::now();
    }

    /// Whether the retention window has elapsed since creation.
    ///
    /// Storage reaps such records on its own schedule; this check makes
    /// a record that lingers past retention evaluate as dead regardless.
    pub fn is_expired(&self, policy: &LockoutPolicy) -> bool {
        let age_ms = (Utc::now() - self.created_at).num_milliseconds();
        age_ms >= policy.retention_ms()
    }

    /// Whether this address is currently locked out.
    ///
    /// Locked iff the failure count reached the policy maximum AND the
    /// last failure is within the sliding window AND the record itself is
    /// still within retention.
    pub fn is_locked(&self, policy: &LockoutPolicy) -> bool {
        if self.is_expired(policy) {
            return false;
        }

        let since_last_ms = (Utc::now() - self.last_attempt_at).num_milliseconds();
        self.count >= policy.max_failures && since_last_ms < policy.window_ms()
    }
}
