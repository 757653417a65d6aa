//! Check Session Use Case
//!
//! Verifies a session token and resolves the owning user.
//!
//! A missing, expired or revoked session is a normal negative result
//! (`Ok(None)`), not an error. Callers that require authentication turn
//! `None` into `SessionInvalid` themselves.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::login::UserProfile;
use crate::application::token::parse_session_token;
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;

/// A verified session together with its owning user
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub session: Session,
    pub user: UserProfile,
}

/// Check session use case
pub struct CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> CheckSessionUseCase<U, S>
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

    /// Verify a token and return the session + user, or `None`
    ///
    /// Expired rows are deactivated on read so later lookups are cheap.
    pub async fn execute(&self, session_token: &str) -> AuthResult<Option<VerifiedSession>> {
        let session_id = match parse_session_token(&self.config.session_secret, session_token) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };

        let session = match self.session_repo.find_by_id(session_id).await? {
            Some(s) => s,
            None => return Ok(None),
        };

        if !session.is_active {
            return Ok(None);
        }

        if session.is_expired() {
            let mut expired = session;
            expired.deactivate();
            self.session_repo.update(&expired).await?;
            return Ok(None);
        }

        // Session is only as valid as its owning user
        let user = match self.user_repo.find_by_id(&session.user_id).await? {
            Some(u) if u.can_login() => u,
            _ => return Ok(None),
        };

        // Update last activity (best effort)
        let mut session = session;
        session.touch();
        if let Err(e) = self.session_repo.update(&session).await {
            tracing::warn!(error = %e, "Failed to update session activity");
        }

        Ok(Some(VerifiedSession {
            user: UserProfile::from(&user),
            session,
        }))
    }

    /// Just check if a token maps to a valid session
    pub async fn is_valid(&self, session_token: &str) -> bool {
        matches!(self.execute(session_token).await, Ok(Some(_)))
    }
}
