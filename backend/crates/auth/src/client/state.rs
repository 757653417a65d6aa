//! Client Auth State Machine
//!
//! One tagged union is the single authoritative discriminant; every
//! boolean the UI needs (`is_loading`, `is_authenticated`, ...) is
//! derived from it, never stored in parallel.
//!
//! Transitions:
//! - `Loading` -> `Authenticated` | `Unauthenticated` | `Error`
//! - `Authenticated` <-> `Error` (failed re-verification)
//! - `Error` -> `Unauthenticated` (recovery)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::application::login::UserProfile;

/// Failure taxonomy surfaced to UI
///
/// Each kind maps to a fixed user-safe message and a recovery strategy;
/// raw backend error text is never rendered to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    InvalidToken,
    ExpiredSession,
    InsufficientPermissions,
    NetworkError,
    UnknownError,
}

/// How the client recovers from a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Clear the stored token and redirect to the login page
    ClearAndRelogin,
    /// Retry the failed fetch after the given number of seconds
    RetryAfterSecs(u32),
    /// No auto-recovery; the user dismisses the message
    ManualDismiss,
    /// Clear the error automatically after the given number of seconds
    AutoClearAfterSecs(u32),
}

impl AuthFailure {
    /// Fixed user-safe message, never leaking internal details
    pub const fn user_message(&self) -> &'static str {
        match self {
            AuthFailure::InvalidToken => "Your session is no longer valid. Please log in again.",
            AuthFailure::ExpiredSession => "Your session has expired. Please log in again.",
            AuthFailure::InsufficientPermissions => {
                "You do not have permission to access this page."
            }
            AuthFailure::NetworkError => "Connection problem. Retrying shortly.",
            AuthFailure::UnknownError => "Something went wrong. Please try again.",
        }
    }

    /// Recovery strategy for this failure kind
    pub const fn recovery(&self) -> RecoveryStrategy {
        match self {
            AuthFailure::InvalidToken | AuthFailure::ExpiredSession => {
                RecoveryStrategy::ClearAndRelogin
            }
            AuthFailure::InsufficientPermissions => RecoveryStrategy::ManualDismiss,
            AuthFailure::NetworkError => RecoveryStrategy::RetryAfterSecs(5),
            AuthFailure::UnknownError => RecoveryStrategy::AutoClearAfterSecs(10),
        }
    }
}

/// Client auth state
#[derive(Debug, Clone)]
pub enum AuthState {
    /// Initial state while the stored token is being verified
    Loading,
    /// Token verified; profile and verification time are both present
    Authenticated {
        user: UserProfile,
        verified_at: DateTime<Utc>,
    },
    /// No token, or the user logged out
    Unauthenticated,
    /// A fetch or verification failed
    Error(AuthFailure),
}

impl AuthState {
    // Derived booleans. These are the only way UI code should ask
    // "am I authenticated"; the discriminant is never duplicated.

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            AuthState::Error(f) => Some(*f),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Token absent at startup
    pub fn on_no_token(self) -> Self {
        AuthState::Unauthenticated
    }

    /// "Current user" fetch succeeded
    pub fn on_fetch_ok(self, user: UserProfile) -> Self {
        AuthState::Authenticated {
            user,
            verified_at: Utc::now(),
        }
    }

    /// "Current user" fetch failed
    pub fn on_fetch_failed(self, failure: AuthFailure) -> Self {
        AuthState::Error(failure)
    }

    /// Explicit logout, or recovery from a cleared error
    pub fn on_logout(self) -> Self {
        AuthState::Unauthenticated
    }

    // ========================================================================
    // Gated render rule
    // ========================================================================

    /// Whether role-gated content may be rendered
    ///
    /// ALL of: token present, profile present, state Authenticated, and
    /// the verification timestamp within `max_age`. A single miss forces
    /// a loading/denied render, never a partial reveal.
    pub fn may_render_gated(&self, token: Option<&str>, max_age: Duration) -> bool {
        let token_present = token.is_some_and(|t| !t.is_empty());
        match self {
            AuthState::Authenticated { verified_at, .. } => {
                token_present && Utc::now() - *verified_at <= max_age
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: &str) -> UserProfile {
        UserProfile {
            user_id: "u-1".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            role: role.to_string(),
            phone: None,
            address: None,
            email_verified: true,
        }
    }

    #[test]
    fn test_loading_to_unauthenticated_without_token() {
        let state = AuthState::Loading.on_no_token();
        assert!(!state.is_loading());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_loading_to_authenticated() {
        let state = AuthState::Loading.on_fetch_ok(profile("user"));
        assert!(state.is_authenticated());
        assert_eq!(state.user().unwrap().name, "Alice");
    }

    #[test]
    fn test_authenticated_to_error_and_back() {
        let state = AuthState::Loading
            .on_fetch_ok(profile("user"))
            .on_fetch_failed(AuthFailure::ExpiredSession);
        assert_eq!(state.failure(), Some(AuthFailure::ExpiredSession));

        let state = state.on_logout();
        assert!(!state.is_authenticated());
        assert!(state.failure().is_none());
    }

    #[test]
    fn test_recovery_strategies() {
        assert_eq!(
            AuthFailure::InvalidToken.recovery(),
            RecoveryStrategy::ClearAndRelogin
        );
        assert_eq!(
            AuthFailure::ExpiredSession.recovery(),
            RecoveryStrategy::ClearAndRelogin
        );
        assert_eq!(
            AuthFailure::InsufficientPermissions.recovery(),
            RecoveryStrategy::ManualDismiss
        );
        assert!(matches!(
            AuthFailure::NetworkError.recovery(),
            RecoveryStrategy::RetryAfterSecs(_)
        ));
        assert!(matches!(
            AuthFailure::UnknownError.recovery(),
            RecoveryStrategy::AutoClearAfterSecs(_)
        ));
    }

    #[test]
    fn test_user_messages_do_not_leak() {
        for failure in [
            AuthFailure::InvalidToken,
            AuthFailure::ExpiredSession,
            AuthFailure::InsufficientPermissions,
            AuthFailure::NetworkError,
            AuthFailure::UnknownError,
        ] {
            let msg = failure.user_message();
            assert!(!msg.is_empty());
            assert!(!msg.contains("sql"));
            assert!(!msg.contains("stack"));
        }
    }

    #[test]
    fn test_gated_render_requires_everything() {
        let max_age = Duration::minutes(2);
        let authenticated = AuthState::Loading.on_fetch_ok(profile("admin"));

        // All conditions met
        assert!(authenticated.may_render_gated(Some("tok"), max_age));

        // Missing token
        assert!(!authenticated.may_render_gated(None, max_age));
        assert!(!authenticated.may_render_gated(Some(""), max_age));

        // Stale verification
        let stale = AuthState::Authenticated {
            user: profile("admin"),
            verified_at: Utc::now() - Duration::minutes(10),
        };
        assert!(!stale.may_render_gated(Some("tok"), max_age));

        // Wrong state entirely
        assert!(!AuthState::Loading.may_render_gated(Some("tok"), max_age));
        assert!(!AuthState::Unauthenticated.may_render_gated(Some("tok"), max_age));
        assert!(
            !AuthState::Error(AuthFailure::UnknownError).may_render_gated(Some("tok"), max_age)
        );
    }
}
