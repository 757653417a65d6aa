//! Verify Role Use Case
//!
//! Server-side role check for a session token. Fails closed: any
//! invalid session yields `has_access = false` rather than an error.

use std::sync::Arc;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthResult;

/// Role check verdict
#[derive(Debug, Clone)]
pub struct RoleCheck {
    pub has_access: bool,
    /// Denial reason (absent on success)
    pub reason: Option<String>,
}

impl RoleCheck {
    fn allow() -> Self {
        Self {
            has_access: true,
            reason: None,
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            has_access: false,
            reason: Some(reason.into()),
        }
    }
}

/// Verify role use case
pub struct VerifyRoleUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> VerifyRoleUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: &str, required: UserRole) -> AuthResult<RoleCheck> {
        let check = CheckSessionUseCase::new(
            self.user_repo.clone(),
            self.session_repo.clone(),
            self.config.clone(),
        );

        let verified = match check.execute(session_token).await? {
            Some(v) => v,
            None => return Ok(RoleCheck::deny("not_authenticated")),
        };

        // Role comes from the user row, not the session snapshot, so a
        // demotion takes effect immediately.
        let role = UserRole::from_code(&verified.user.role).unwrap_or(UserRole::User);

        if role.grants(required) {
            Ok(RoleCheck::allow())
        } else {
            tracing::warn!(
                user_id = %verified.user.user_id,
                role = %role,
                required = %required,
                "Role check denied"
            );
            Ok(RoleCheck::deny("insufficient_role"))
        }
    }
}
