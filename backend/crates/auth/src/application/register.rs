//! Register Use Case
//!
//! Creates a new member account.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Maximum display name length
const NAME_MAX_LENGTH: usize = 100;

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: String,
}

/// Register output
pub struct RegisterOutput {
    pub user_id: String,
}

/// Register use case
pub struct RegisterUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<U, C> RegisterUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    pub fn new(user_repo: Arc<U>, credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Validate email (trimmed, lowercased)
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::Validation("Name cannot be empty".to_string()));
        }
        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Name must be at most {} characters",
                NAME_MAX_LENGTH
            )));
        }

        let phone = input
            .phone
            .map(|p| Self::validate_phone(p.trim()))
            .transpose()?;

        // Validate and hash the password before touching the store
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Duplicate email check (case-insensitive by construction)
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let user = User::new(email, name, phone, input.address);
        let credential = Credential::new(user.user_id, password_hash);

        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credential).await?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id.to_string(),
        })
    }

    fn validate_phone(phone: &str) -> AuthResult<String> {
        let digits = phone
            .chars()
            .filter(|c| c.is_ascii_digit())
            .count();

        let well_formed = phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));

        if !well_formed || digits < 6 || digits > 15 {
            return Err(AuthError::Validation(
                "Invalid phone number format".to_string(),
            ));
        }

        Ok(phone.to_string())
    }
}
