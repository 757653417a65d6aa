//! Client-Side Role Verification
//!
//! Orchestrates `verify_role` for UI frontends: a local permission check
//! derived from the held role, server confirmation before a positive
//! admin verdict is first used, and the short-TTL verdict cache in
//! between. The locally held role is display state only; it can deny on
//! its own but never allow elevated access on its own.

use std::time::Duration;

use crate::client::role_cache::RoleVerificationCache;
use crate::client::state::{AuthFailure, AuthState};
use crate::domain::value_object::user_role::UserRole;

/// Authoritative server-side role check
///
/// In a real client this is an HTTP call to the verify-role endpoint;
/// tests substitute a stub.
#[trait_variant::make(ServerRoleCheck: Send)]
pub trait LocalServerRoleCheck {
    async fn confirm_role(&self, token: &str, required: UserRole) -> Result<bool, AuthFailure>;
}

/// Role verifier consumed by UI code
pub struct ClientRoleVerifier<S> {
    server: S,
    cache: RoleVerificationCache,
}

impl<S: ServerRoleCheck> ClientRoleVerifier<S> {
    pub fn new(server: S, cache_ttl: Duration) -> Self {
        Self {
            server,
            cache: RoleVerificationCache::new(cache_ttl),
        }
    }

    /// Check whether the current user holds `required`
    ///
    /// Fails closed (`InsufficientPermissions`) unless the state is
    /// `Authenticated` and a token is present. A fresh cached verdict is
    /// served first; otherwise the permission is derived from the held
    /// role (admin grants both levels), and a positive admin verdict is
    /// additionally confirmed server-side before it is returned.
    pub async fn verify_role(
        &self,
        state: &AuthState,
        token: Option<&str>,
        required: UserRole,
    ) -> Result<bool, AuthFailure> {
        let (Some(user), Some(token)) = (state.user(), token) else {
            return Err(AuthFailure::InsufficientPermissions);
        };

        if let Some(verdict) = self.cache.get(&user.user_id, required) {
            return Ok(verdict.allowed);
        }

        let held = UserRole::from_code(&user.role).unwrap_or(UserRole::User);
        if !held.grants(required) {
            self.cache.put(&user.user_id, required, false, false);
            return Ok(false);
        }

        if required.is_admin() {
            // Server-side user data is the authority for elevated access
            let allowed = self.server.confirm_role(token, required).await?;
            self.cache.put(&user.user_id, required, allowed, true);
            return Ok(allowed);
        }

        self.cache.put(&user.user_id, required, true, false);
        Ok(true)
    }

    /// Fresh check for sensitive operations
    ///
    /// Discards the cached verdict first so a stale allow can never be
    /// returned, then runs the full `verify_role` flow.
    pub async fn re_verify_role(
        &self,
        state: &AuthState,
        token: Option<&str>,
        required: UserRole,
    ) -> Result<bool, AuthFailure> {
        if let Some(user) = state.user() {
            self.cache.invalidate(&user.user_id, required);
        }
        self.verify_role(state, token, required).await
    }

    /// Drop all cached verdicts (logout, user switch)
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
