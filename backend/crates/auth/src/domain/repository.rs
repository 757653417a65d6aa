//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{credential::Credential, session::Session, user::User};
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::AuthResult;
use uuid::Uuid;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (email is stored lowercase)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Count active users with the given role
    async fn count_active_with_role(&self, role: UserRole) -> AuthResult<u64>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Create credentials
    async fn create(&self, credential: &Credential) -> AuthResult<()>;

    /// Find credentials by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>>;

    /// Update credentials
    async fn update(&self, credential: &Credential) -> AuthResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find a session by ID (active or not)
    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>>;

    /// Update session (activity, deactivation)
    async fn update(&self, session: &Session) -> AuthResult<()>;

    /// Deactivate all active sessions for a user, returning how many were hit
    async fn deactivate_all_for_user(&self, user_id: &UserId) -> AuthResult<u64>;

    /// Delete sessions whose expiry is in the past
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Rate limit record repository trait (sliding log)
#[trait_variant::make(RateLimitRepository: Send)]
pub trait LocalRateLimitRepository {
    /// Count records for (actor, action) recorded at or after `since_ms`
    async fn count_since(&self, actor_key: &str, action: &str, since_ms: i64) -> AuthResult<u64>;

    /// Record an attempt for (actor, action) at `recorded_at_ms`
    async fn record(&self, actor_key: &str, action: &str, recorded_at_ms: i64) -> AuthResult<()>;

    /// Delete records older than `cutoff_ms` to bound storage
    async fn purge_older_than(&self, cutoff_ms: i64) -> AuthResult<u64>;
}
