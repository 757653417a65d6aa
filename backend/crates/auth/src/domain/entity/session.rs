//! Session Entity
//!
//! Represents an authenticated user session.
//! Stored in database and referenced by an HMAC-signed cookie token.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::{user_id::UserId, user_role::UserRole};

/// Session entity
///
/// At most one active session per user: creating a new session
/// deactivates all prior active sessions for that user (enforced by
/// the login use case, not by this struct).
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Reference to User
    pub user_id: UserId,
    /// User role at session creation
    pub user_role: UserRole,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Whether the session is active (login sets, logout clears)
    pub is_active: bool,
    /// Client IP (optional, for logging)
    pub client_ip: Option<String>,
    /// User agent string (for session management display)
    pub user_agent: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Create a new active session
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(
        user_id: UserId,
        user_role: UserRole,
        client_ip: Option<String>,
        user_agent: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            user_role,
            expires_at_ms: (now + ttl).timestamp_millis(),
            is_active: true,
            client_ip,
            user_agent,
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// A session is valid iff it is active and unexpired.
    ///
    /// The owning user's status is checked separately by the use case.
    pub fn is_valid(&self) -> bool {
        self.is_active && !self.is_expired()
    }

    /// Mark the session inactive (logout / revocation)
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.last_activity_at = Utc::now();
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        let now_ms = Utc::now().timestamp_millis();
        (self.expires_at_ms - now_ms).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_valid() {
        let session = Session::new(
            UserId::new(),
            UserRole::User,
            None,
            None,
            Duration::hours(24),
        );
        assert!(session.is_active);
        assert!(!session.is_expired());
        assert!(session.is_valid());
        assert!(session.remaining_ms() > 0);
    }

    #[test]
    fn test_expired_session_invalid_even_if_active() {
        let mut session = Session::new(
            UserId::new(),
            UserRole::User,
            None,
            None,
            Duration::hours(24),
        );
        session.expires_at_ms = Utc::now().timestamp_millis() - 1_000;

        assert!(session.is_active);
        assert!(session.is_expired());
        assert!(!session.is_valid());
        assert_eq!(session.remaining_ms(), 0);
    }

    #[test]
    fn test_deactivate() {
        let mut session = Session::new(
            UserId::new(),
            UserRole::Admin,
            None,
            None,
            Duration::hours(24),
        );
        session.deactivate();
        assert!(!session.is_active);
        assert!(!session.is_valid());
    }
}
