//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions plus an in-memory store suitable
//! for per-process request throttling (e.g. per-IP guards).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment rate limit counter
    /// Returns (allowed, remaining_requests)
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

// ============================================================================
// In-Memory Store (fixed window)
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    window_start_ms: i64,
    count: u32,
}

/// In-memory fixed-window rate limit store
///
/// Each key gets a counter that resets when its window expires.
/// State is per-process; suitable for per-IP guards on a single node.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn now_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    fn check_sync(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        let now_ms = Self::now_ms();
        let window_ms = config.window_ms();

        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            // A poisoned lock only means another thread panicked mid-insert;
            // the map itself is still usable.
            Err(poisoned) => poisoned.into_inner(),
        };

        // Opportunistic cleanup of expired windows
        if entries.len() > 1024 {
            entries.retain(|_, e| now_ms - e.window_start_ms < window_ms);
        }

        let entry = entries.entry(key.to_string()).or_insert(WindowEntry {
            window_start_ms: now_ms,
            count: 0,
        });

        if now_ms - entry.window_start_ms >= window_ms {
            entry.window_start_ms = now_ms;
            entry.count = 0;
        }

        let reset_at_ms = entry.window_start_ms + window_ms;

        if entry.count >= config.max_requests {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at_ms,
            };
        }

        entry.count += 1;

        RateLimitResult {
            allowed: true,
            remaining: config.max_requests - entry.count,
            reset_at_ms,
        }
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.check_sync(key, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `use super::*` brings both trait variants into scope, so the
    // method calls below are fully qualified.

    #[tokio::test]
    async fn test_allows_up_to_limit() {
        let store = InMemoryRateLimitStore::new();
        let config = RateLimitConfig::new(3, 60);

        for i in 0..3 {
            let result = RateLimitStore::check_and_increment(&store, "ip:1.2.3.4", &config)
                .await
                .unwrap();
            assert!(result.allowed, "request {} should be allowed", i + 1);
            assert_eq!(result.remaining, 2 - i);
        }

        let result = RateLimitStore::check_and_increment(&store, "ip:1.2.3.4", &config)
            .await
            .unwrap();
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryRateLimitStore::new();
        let config = RateLimitConfig::new(1, 60);

        assert!(
            RateLimitStore::check_and_increment(&store, "a", &config)
                .await
                .unwrap()
                .allowed
        );
        assert!(
            !RateLimitStore::check_and_increment(&store, "a", &config)
                .await
                .unwrap()
                .allowed
        );
        assert!(
            RateLimitStore::check_and_increment(&store, "b", &config)
                .await
                .unwrap()
                .allowed
        );
    }

    #[tokio::test]
    async fn test_reset_at_is_in_future() {
        let store = InMemoryRateLimitStore::new();
        let config = RateLimitConfig::new(5, 60);

        let result = RateLimitStore::check_and_increment(&store, "k", &config)
            .await
            .unwrap();
        let now_ms = InMemoryRateLimitStore::now_ms();
        assert!(result.reset_at_ms > now_ms);
        assert!(result.reset_at_ms <= now_ms + config.window_ms());
    }
}
