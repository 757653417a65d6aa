//! Security Headers and Security Event Tracking

use std::collections::HashMap;
use std::sync::Mutex;

use axum::http::{HeaderMap, HeaderValue};
use chrono::{Duration, Utc};

// ============================================================================
// Security Headers
// ============================================================================

/// Apply the fixed security-header set to a response
///
/// HSTS is only attached when the deployment serves HTTPS (cookie_secure).
pub fn apply_security_headers(headers: &mut HeaderMap, https: bool) {
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("X-XSS-Protection", HeaderValue::from_static("1; mode=block"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(
            "default-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'",
        ),
    );
    if https {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }
}

/// Attach `X-RateLimit-*` headers to a response
pub fn apply_rate_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_at_ms: i64) {
    if let Ok(v) = HeaderValue::from_str(&limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = HeaderValue::from_str(&remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = HeaderValue::from_str(&(reset_at_ms / 1000).to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }
}

// ============================================================================
// Security Event Log
// ============================================================================

/// Denial reason recorded with each security event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NoToken,
    InvalidToken,
    RoleViolation,
    RateLimitExceeded,
}

impl DenialReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DenialReason::NoToken => "no_token",
            DenialReason::InvalidToken => "invalid_token",
            DenialReason::RoleViolation => "role_violation",
            DenialReason::RateLimitExceeded => "rate_limit_exceeded",
        }
    }
}

/// In-memory per-IP failure tally
///
/// Per-process and reset on restart: a detection aid, not a security
/// boundary. Crossing the threshold within a trailing hour emits a
/// suspicious-activity warning.
#[derive(Debug)]
pub struct SecurityEventLog {
    threshold: u32,
    failures: Mutex<HashMap<String, Vec<i64>>>,
}

impl SecurityEventLog {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Record a denial and return the failure count for this IP over the
    /// trailing hour
    pub fn record_denial(&self, ip: &str, path: &str, reason: DenialReason) -> u32 {
        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let hour_ago_ms = (now - Duration::hours(1)).timestamp_millis();

        tracing::warn!(
            ip = %ip,
            path = %path,
            reason = reason.as_str(),
            "Access denied"
        );

        let mut failures = match self.failures.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let timestamps = failures.entry(ip.to_string()).or_default();
        timestamps.retain(|&t| t >= hour_ago_ms);
        timestamps.push(now_ms);
        let count = timestamps.len() as u32;

        if count == self.threshold {
            tracing::warn!(
                ip = %ip,
                failures_last_hour = count,
                "Suspicious activity detected"
            );
        }

        count
    }

    /// Current failure count for an IP over the trailing hour
    pub fn failure_count(&self, ip: &str) -> u32 {
        let hour_ago_ms = (Utc::now() - Duration::hours(1)).timestamp_millis();

        let failures = match self.failures.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        failures
            .get(ip)
            .map(|ts| ts.iter().filter(|&&t| t >= hour_ago_ms).count() as u32)
            .unwrap_or(0)
    }
}
