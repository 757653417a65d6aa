//! Role Verification Cache
//!
//! Short-lived client-side cache of "does this user currently hold role
//! X". The cache may only shorten the path to a deny: a positive admin
//! verdict must be server-confirmed before its first use, and
//! `re_verify` discards the cached entry so it can never return a stale
//! allow.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::value_object::user_role::UserRole;

/// A cached role-check verdict
#[derive(Debug, Clone, Copy)]
pub struct CachedVerdict {
    pub allowed: bool,
    pub verified_at: DateTime<Utc>,
    /// Whether the verdict came from the server (vs. the local role hint)
    pub server_confirmed: bool,
}

impl CachedVerdict {
    fn is_fresh(&self, ttl: Duration) -> bool {
        let age = Utc::now() - self.verified_at;
        age.to_std().map(|a| a <= ttl).unwrap_or(false)
    }
}

/// Per-(user, role) verification cache
#[derive(Debug)]
pub struct RoleVerificationCache {
    ttl: Duration,
    entries: Mutex<HashMap<(String, UserRole), CachedVerdict>>,
}

impl RoleVerificationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a fresh cached verdict
    ///
    /// A cached denial is always honored. A cached allow is returned only
    /// when it was server-confirmed; a local-only allow never satisfies a
    /// lookup, forcing callers through the server check.
    pub fn get(&self, user_id: &str, role: UserRole) -> Option<CachedVerdict> {
        let entries = self.lock();
        let verdict = entries.get(&(user_id.to_string(), role)).copied()?;

        if !verdict.is_fresh(self.ttl) {
            return None;
        }

        if verdict.allowed && !verdict.server_confirmed {
            return None;
        }

        Some(verdict)
    }

    /// Store a verdict
    pub fn put(&self, user_id: &str, role: UserRole, allowed: bool, server_confirmed: bool) {
        let mut entries = self.lock();
        entries.insert(
            (user_id.to_string(), role),
            CachedVerdict {
                allowed,
                verified_at: Utc::now(),
                server_confirmed,
            },
        );
    }

    /// Discard the cached verdict for (user, role)
    ///
    /// Sensitive operations call this before re-checking so a stale allow
    /// can never be returned.
    pub fn invalidate(&self, user_id: &str, role: UserRole) {
        let mut entries = self.lock();
        entries.remove(&(user_id.to_string(), role));
    }

    /// Drop everything (logout, user switch)
    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, UserRole), CachedVerdict>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for RoleVerificationCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(120))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_on_empty_cache() {
        let cache = RoleVerificationCache::default();
        assert!(cache.get("u-1", UserRole::Admin).is_none());
    }

    #[test]
    fn test_server_confirmed_allow_is_cached() {
        let cache = RoleVerificationCache::default();
        cache.put("u-1", UserRole::Admin, true, true);

        let verdict = cache.get("u-1", UserRole::Admin).unwrap();
        assert!(verdict.allowed);
        assert!(verdict.server_confirmed);
    }

    #[test]
    fn test_local_allow_never_satisfies_lookup() {
        let cache = RoleVerificationCache::default();
        cache.put("u-1", UserRole::Admin, true, false);

        // A locally derived allow must not short-circuit the server check
        assert!(cache.get("u-1", UserRole::Admin).is_none());
    }

    #[test]
    fn test_denial_is_honored_even_unconfirmed() {
        let cache = RoleVerificationCache::default();
        cache.put("u-1", UserRole::Admin, false, false);

        let verdict = cache.get("u-1", UserRole::Admin).unwrap();
        assert!(!verdict.allowed);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = RoleVerificationCache::new(Duration::from_secs(0));
        cache.put("u-1", UserRole::User, true, true);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(cache.get("u-1", UserRole::User).is_none());
    }

    #[test]
    fn test_invalidate_discards_entry() {
        let cache = RoleVerificationCache::default();
        cache.put("u-1", UserRole::Admin, true, true);
        cache.invalidate("u-1", UserRole::Admin);
        assert!(cache.get("u-1", UserRole::Admin).is_none());
    }

    #[test]
    fn test_entries_are_per_user_and_role() {
        let cache = RoleVerificationCache::default();
        cache.put("u-1", UserRole::Admin, true, true);

        assert!(cache.get("u-2", UserRole::Admin).is_none());
        assert!(cache.get("u-1", UserRole::User).is_none());
    }

    #[test]
    fn test_clear() {
        let cache = RoleVerificationCache::default();
        cache.put("u-1", UserRole::Admin, true, true);
        cache.put("u-2", UserRole::User, false, true);
        cache.clear();
        assert!(cache.get("u-1", UserRole::Admin).is_none());
        assert!(cache.get("u-2", UserRole::User).is_none());
    }
}
