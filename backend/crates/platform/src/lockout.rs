//! Lockout Policy Infrastructure
//!
//! Brute-force lockout configuration shared between the failure tracker
//! and its storage backend.

use std::time::Duration;

/// Lockout policy for failed login attempts
///
/// A source address is locked once it accumulates `max_failures` within
/// `window` of its most recent failure. Records are retained for
/// `retention` from creation regardless of activity; a record past its
/// retention never counts as locked, even if storage has not reaped it yet.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    /// Failures required to trip the lock
    pub max_failures: u32,
    /// Sliding window measured from the last failed attempt
    pub window: Duration,
    /// Absolute record lifetime measured from creation
    pub retention: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failures: 5,
            window: Duration::from_secs(15 * 60),
            retention: Duration::from_secs(15 * 60),
        }
    }
}

impl LockoutPolicy {
    pub fn new(max_failures: u32, window_secs: u64) -> Self {
        Self {
            max_failures,
            window: Duration::from_secs(window_secs),
            retention: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    pub fn retention_ms(&self) -> i64 {
        self.retention.as_millis() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = LockoutPolicy::default();
        assert_eq!(policy.max_failures, 5);
        assert_eq!(policy.window_ms(), 15 * 60 * 1000);
        assert_eq!(policy.retention_ms(), 15 * 60 * 1000);
    }
}
