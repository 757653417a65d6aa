//! User Management Use Cases (admin only)
//!
//! Role changes and status toggles with two hard guards:
//! - admins cannot target their own account
//! - the last active admin can never be demoted or deactivated

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// User management use case
pub struct ManageUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ManageUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Change a user's role
    pub async fn update_role(
        &self,
        acting_admin: &UserId,
        target: &UserId,
        new_role: UserRole,
    ) -> AuthResult<()> {
        if acting_admin == target {
            return Err(AuthError::SelfTarget);
        }

        let mut user = self
            .user_repo
            .find_by_id(target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.user_role == new_role {
            return Ok(());
        }

        // Demoting an admin must not remove the last one
        if user.is_active_admin() && !new_role.is_admin() {
            self.ensure_not_last_admin().await?;
        }

        let old_role = user.user_role;
        user.set_role(new_role);
        self.user_repo.update(&user).await?;

        tracing::info!(
            admin_id = %acting_admin,
            target_id = %target,
            old_role = %old_role,
            new_role = %new_role,
            "User role updated"
        );

        Ok(())
    }

    /// Toggle a user's active/disabled status
    pub async fn toggle_status(&self, acting_admin: &UserId, target: &UserId) -> AuthResult<User> {
        if acting_admin == target {
            return Err(AuthError::SelfTarget);
        }

        let mut user = self
            .user_repo
            .find_by_id(target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Deactivating an admin must not remove the last one
        if user.is_active_admin() {
            self.ensure_not_last_admin().await?;
        }

        user.toggle_status();
        self.user_repo.update(&user).await?;

        tracing::info!(
            admin_id = %acting_admin,
            target_id = %target,
            new_status = %user.user_status,
            "User status toggled"
        );

        Ok(user)
    }

    /// Reject the operation if only one active admin remains
    async fn ensure_not_last_admin(&self) -> AuthResult<()> {
        let active_admins = self
            .user_repo
            .count_active_with_role(UserRole::Admin)
            .await?;
        if active_admins <= 1 {
            return Err(AuthError::LastAdmin);
        }
        Ok(())
    }
}
