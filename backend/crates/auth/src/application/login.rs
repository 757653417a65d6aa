//! Login Use Case
//!
//! Authenticates a member and creates a session.
//!
//! Every client-visible failure is the same generic `InvalidCredentials`,
//! whether the email does not exist, the password is wrong, or the account
//! is disabled. The distinction goes to server-side tracing only.

use std::sync::Arc;

use crate::application::check_rate_limit::CheckRateLimitUseCase;
use crate::application::config::AuthConfig;
use crate::application::token::sign_session_token;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{
    CredentialRepository, RateLimitRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Rate-limit action name for login attempts
pub const LOGIN_ACTION: &str = "login";

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Public user projection returned on success (no password hash)
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email_verified: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            role: user.user_role.code().to_string(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            email_verified: user.email_verified,
        }
    }
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed session token for cookie
    pub session_token: String,
    /// Session expiry (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Public user projection
    pub user: UserProfile,
}

/// Login use case
pub struct LoginUseCase<U, C, S, R>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
    R: RateLimitRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    session_repo: Arc<S>,
    rate_limit_repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<U, C, S, R> LoginUseCase<U, C, S, R>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
    R: RateLimitRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        session_repo: Arc<S>,
        rate_limit_repo: Arc<R>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            session_repo,
            rate_limit_repo,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Normalize email for both the lookup and the rate-limit key
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        // Throttle before hitting credentials
        let rate_limit = CheckRateLimitUseCase::new(self.rate_limit_repo.clone());
        rate_limit
            .execute(
                email.as_str(),
                LOGIN_ACTION,
                self.config.login_rate_window,
                self.config.login_rate_max_attempts,
            )
            .await?;

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::info!(email = %email, "Login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !user.can_login() {
            // Same client-visible error as a bad password
            tracing::info!(user_id = %user.user_id, "Login failed: account disabled");
            return Err(AuthError::InvalidCredentials);
        }

        let credential = self
            .credential_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Credential not found".to_string()))?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !credential
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            tracing::info!(user_id = %user.user_id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        // One active session per user: revoke older ones first
        let revoked = self
            .session_repo
            .deactivate_all_for_user(&user.user_id)
            .await?;
        if revoked > 0 {
            tracing::debug!(user_id = %user.user_id, revoked, "Deactivated prior sessions");
        }

        let session = Session::new(
            user.user_id,
            user.user_role,
            input.client_ip,
            input.user_agent,
            self.config.session_ttl_chrono(),
        );
        self.session_repo.create(&session).await?;

        // Token is only issued after the session row exists
        let session_token = sign_session_token(&self.config.session_secret, session.session_id)?;

        let mut user = user;
        user.record_login();
        self.user_repo.update(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            session_token,
            expires_at_ms: session.expires_at_ms,
            user: UserProfile::from(&user),
        })
    }
}
