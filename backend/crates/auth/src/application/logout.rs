//! Logout Use Case
//!
//! Idempotently deactivates a session. The cookie is always cleared by
//! the handler regardless of whether a matching session row existed.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::parse_session_token;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Deactivate the session behind the token, if any
    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let session_id = match parse_session_token(&self.config.session_secret, session_token) {
            Ok(id) => id,
            // Bad token on logout is not an error
            Err(_) => return Ok(()),
        };

        if let Some(mut session) = self.session_repo.find_by_id(session_id).await? {
            if session.is_active {
                session.deactivate();
                self.session_repo.update(&session).await?;
                tracing::info!(session_id = %session_id, "User logged out");
            }
        }

        Ok(())
    }
}
