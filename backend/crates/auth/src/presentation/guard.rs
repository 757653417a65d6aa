//! Route Guard Middleware
//!
//! Intercepts every request:
//! 1. per-IP rate limit (429 + Retry-After on excess)
//! 2. public allowlist pass-through
//! 3. session validation for protected path patterns
//! 4. role comparison (`/admin` needs admin, `/dashboard` needs user-or-admin)
//! 5. identity headers on success, redirects on denial
//! 6. security headers on every response
//!
//! Unauthenticated and unauthorized are distinct outcomes: no/invalid
//! token redirects to the login page, a valid session with the wrong
//! role redirects to the user landing page.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use platform::client::extract_client_ip;
use platform::cookie::extract_cookie;
use platform::rate_limit::{RateLimitConfig, RateLimitStore};

use crate::application::check_session::{CheckSessionUseCase, VerifiedSession};
use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;
use crate::presentation::security::{
    DenialReason, SecurityEventLog, apply_rate_limit_headers, apply_security_headers,
};

/// Paths that never require authentication
const PUBLIC_PATHS: &[&str] = &["/", "/auth/login", "/auth/register", "/privacy-policy", "/setup"];

/// Path prefixes that never require authentication
const PUBLIC_PREFIXES: &[&str] = &["/news", "/api/auth"];

/// Verified identity attached to the request after a successful guard pass
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: UserRole,
    pub email: String,
    pub name: String,
}

impl From<&VerifiedSession> for AuthenticatedUser {
    fn from(v: &VerifiedSession) -> Self {
        Self {
            user_id: v.user.user_id.clone(),
            role: UserRole::from_code(&v.user.role).unwrap_or(UserRole::User),
            email: v.user.email.clone(),
            name: v.user.name.clone(),
        }
    }
}

/// Guard state
pub struct GuardState<R, L> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub rate_store: Arc<L>,
    pub events: Arc<SecurityEventLog>,
}

impl<R, L> Clone for GuardState<R, L> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            rate_store: self.rate_store.clone(),
            events: self.events.clone(),
        }
    }
}

/// The route guard middleware
pub async fn route_guard<R, L>(
    State(state): State<GuardState<R, L>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let path = req.uri().path().to_string();
    let https = state.config.cookie_secure;

    let client_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(req.headers(), client_ip);
    let ip_key = client_ip
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // 1. Global per-IP rate limit
    let rate_config = RateLimitConfig {
        max_requests: state.config.guard_rate_max_requests,
        window: state.config.guard_rate_window,
    };
    let rate = match state
        .rate_store
        .check_and_increment(&ip_key, &rate_config)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Rate limit store failure");
            // Fail open on the limiter itself; the session check below
            // remains authoritative.
            platform::rate_limit::RateLimitResult {
                allowed: true,
                remaining: rate_config.max_requests,
                reset_at_ms: Utc::now().timestamp_millis() + rate_config.window_ms(),
            }
        }
    };

    if !rate.allowed {
        state
            .events
            .record_denial(&ip_key, &path, DenialReason::RateLimitExceeded);
        let mut response = AuthError::RateLimitExceeded.into_response();
        finish(response.headers_mut(), https, &rate_config, &rate);
        return response;
    }

    let token = extract_token(req.headers(), &state.config.session_cookie_name);

    // 2. Authenticated users hitting login/register go to their landing page
    if path == "/auth/login" || path == "/auth/register" {
        if let Some(token) = &token {
            let check = CheckSessionUseCase::new(
                state.repo.clone(),
                state.repo.clone(),
                state.config.clone(),
            );
            if let Ok(Some(verified)) = check.execute(token).await {
                let role = UserRole::from_code(&verified.user.role).unwrap_or(UserRole::User);
                let mut response = redirect(role.landing_path());
                finish(response.headers_mut(), https, &rate_config, &rate);
                return response;
            }
        }
    }

    // 3. Public allowlist
    if is_public_path(&path) {
        let mut response = next.run(req).await;
        finish(response.headers_mut(), https, &rate_config, &rate);
        return response;
    }

    // 4. Protected patterns
    let required = match required_role_for(&path) {
        Some(role) => role,
        None => {
            // Not guarded; still gets security headers
            let mut response = next.run(req).await;
            finish(response.headers_mut(), https, &rate_config, &rate);
            return response;
        }
    };

    let Some(token) = token else {
        state
            .events
            .record_denial(&ip_key, &path, DenialReason::NoToken);
        let mut response = redirect_to_login(&path);
        finish(response.headers_mut(), https, &rate_config, &rate);
        return response;
    };

    let check =
        CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let verified = match check.execute(&token).await {
        Ok(Some(v)) => v,
        Ok(None) => {
            state
                .events
                .record_denial(&ip_key, &path, DenialReason::InvalidToken);
            let mut response = redirect_to_login(&path);
            clear_session_cookie(response.headers_mut(), &state.config);
            finish(response.headers_mut(), https, &rate_config, &rate);
            return response;
        }
        Err(e) => {
            let mut response = e.into_response();
            finish(response.headers_mut(), https, &rate_config, &rate);
            return response;
        }
    };

    let identity = AuthenticatedUser::from(&verified);

    if !identity.role.grants(required) {
        state
            .events
            .record_denial(&ip_key, &path, DenialReason::RoleViolation);
        tracing::warn!(
            user_id = %identity.user_id,
            role = %identity.role,
            required = %required,
            path = %path,
            "Role violation"
        );
        // Unauthorized, not unauthenticated: send to the user landing page
        let mut response = redirect(UserRole::User.landing_path());
        finish(response.headers_mut(), https, &rate_config, &rate);
        return response;
    }

    // 5. Success: stamp identity for downstream consumers
    req.extensions_mut().insert(identity.clone());

    let mut response = next.run(req).await;
    stamp_identity_headers(response.headers_mut(), &identity);
    finish(response.headers_mut(), https, &rate_config, &rate);
    response
}

/// Middleware requiring an admin session (for API routes, JSON errors)
///
/// On success the request gets an `AuthenticatedUser` extension.
pub async fn require_admin<R>(
    State(state): State<AdminGateState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token = extract_token(req.headers(), &state.config.session_cookie_name)
        .ok_or_else(|| AuthError::SessionInvalid.into_response())?;

    let check =
        CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let verified = match check.execute(&token).await {
        Ok(Some(v)) => v,
        Ok(None) => return Err(AuthError::SessionInvalid.into_response()),
        Err(e) => return Err(e.into_response()),
    };

    let identity = AuthenticatedUser::from(&verified);
    if !identity.role.is_admin() {
        return Err(AuthError::InsufficientRole.into_response());
    }

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// State for the admin gate middleware
pub struct AdminGateState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AdminGateState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Whether the path is on the public allowlist
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
        || PUBLIC_PREFIXES
            .iter()
            .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

/// Role requirement for protected path patterns
pub fn required_role_for(path: &str) -> Option<UserRole> {
    if path == "/admin" || path.starts_with("/admin/") {
        Some(UserRole::Admin)
    } else if path == "/dashboard" || path.starts_with("/dashboard/") {
        Some(UserRole::User)
    } else {
        None
    }
}

/// Extract the session token from cookie or bearer header
pub fn extract_token(headers: &axum::http::HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = extract_cookie(headers, cookie_name) {
        if !token.is_empty() {
            return Some(token);
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn redirect(to: &str) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, to.to_string())],
    )
        .into_response()
}

fn redirect_to_login(requested_path: &str) -> Response {
    redirect(&format!("/auth/login?redirect={requested_path}"))
}

fn clear_session_cookie(headers: &mut axum::http::HeaderMap, config: &AuthConfig) {
    let cookie = format!(
        "{}=; HttpOnly; Path=/; Max-Age=0",
        config.session_cookie_name
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.append(header::SET_COOKIE, value);
    }
}

fn stamp_identity_headers(headers: &mut axum::http::HeaderMap, identity: &AuthenticatedUser) {
    let pairs = [
        ("X-User-ID", identity.user_id.as_str()),
        ("X-User-Role", identity.role.code()),
        ("X-User-Email", identity.email.as_str()),
        ("X-User-Name", identity.name.as_str()),
        ("X-Auth-Validated", "true"),
    ];
    for (name, value) in pairs {
        if let Ok(v) = HeaderValue::from_str(value) {
            headers.insert(name, v);
        }
    }
    if let Ok(v) = HeaderValue::from_str(&Utc::now().timestamp_millis().to_string()) {
        headers.insert("X-Auth-Timestamp", v);
    }
}

/// Security + rate-limit headers shared by every guard exit path
fn finish(
    headers: &mut axum::http::HeaderMap,
    https: bool,
    rate_config: &RateLimitConfig,
    rate: &platform::rate_limit::RateLimitResult,
) {
    apply_security_headers(headers, https);
    apply_rate_limit_headers(
        headers,
        rate_config.max_requests,
        rate.remaining,
        rate.reset_at_ms,
    );
}
