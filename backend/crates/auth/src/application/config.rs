//! Application Configuration
//!
//! Configuration for the Auth application layer. Every tuning constant
//! (TTLs, windows, thresholds) lives here rather than being hard-coded
//! at call sites.

use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session TTL (24 hours)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Login rate limit: window length
    pub login_rate_window: Duration,
    /// Login rate limit: max attempts per window
    pub login_rate_max_attempts: u32,
    /// Route guard: per-IP request limit per window
    pub guard_rate_max_requests: u32,
    /// Route guard: per-IP window length
    pub guard_rate_window: Duration,
    /// Role verification cache TTL (client side)
    pub role_cache_ttl: Duration,
    /// Per-IP auth failures per trailing hour before a suspicious-activity event
    pub suspicious_threshold: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "sessionToken".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            login_rate_window: Duration::from_secs(15 * 60),
            login_rate_max_attempts: 5,
            guard_rate_max_requests: 100,
            guard_rate_window: Duration::from_secs(60),
            role_cache_ttl: Duration::from_secs(2 * 60),
            suspicious_threshold: 10,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in milliseconds
    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    /// Get session TTL as a chrono Duration
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.session_ttl_ms())
    }

    /// Login rate-limit window in milliseconds
    pub fn login_rate_window_ms(&self) -> i64 {
        self.login_rate_window.as_millis() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
