//! HTTP Handlers
//!
//! Thin adapters between HTTP and the application use cases. Handlers
//! are generic over the repository so tests can swap in-memory stores
//! for Postgres.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use platform::client::extract_client_info;
use platform::cookie::CookieConfig;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::logout::LogoutUseCase;
use crate::application::manage_users::ManageUsersUseCase;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::verify_role::VerifyRoleUseCase;
use crate::domain::repository::{
    CredentialRepository, RateLimitRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
    SessionStatusResponse, ToggleStatusRequest, UpdateRoleRequest, UserDto, VerifyRoleRequest,
    VerifyRoleResponse,
};
use crate::presentation::guard::{AuthenticatedUser, extract_token};

/// Shared handler state
pub struct AuthAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Session cookie settings derived from the auth config
fn session_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl.as_secs() as i64),
    }
}

// ============================================================================
// Registration
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + CredentialRepository + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            name: req.name,
            phone: req.phone,
            address: req.address,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: output.user_id,
            message: "Registration successful".to_string(),
        }),
    ))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: UserRepository
        + CredentialRepository
        + SessionRepository
        + RateLimitRepository
        + Send
        + Sync
        + 'static,
{
    let client = extract_client_info(&headers, None);

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
            client_ip: client.ip_string(),
            user_agent: client.user_agent,
        })
        .await?;

    let cookie = session_cookie(&state.config);
    let body = Json(LoginResponse {
        user: UserDto::from(output.user),
        expires_at_ms: output.expires_at_ms,
    });

    Ok((
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            cookie.build_set_cookie(&output.session_token),
        )],
        body,
    )
        .into_response())
}

/// POST /logout
///
/// Always clears the cookie, even when the token was invalid.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: SessionRepository + Send + Sync + 'static,
{
    if let Some(token) = extract_token(&headers, &state.config.session_cookie_name) {
        let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
        use_case.execute(&token).await?;
    }

    let cookie = session_cookie(&state.config);
    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cookie.build_delete_cookie())],
    )
        .into_response())
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /status
///
/// Always 200; `authenticated` carries the verdict.
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    let anonymous = SessionStatusResponse {
        authenticated: false,
        user: None,
        expires_at_ms: None,
    };

    let Some(token) = extract_token(&headers, &state.config.session_cookie_name) else {
        return Ok(Json(anonymous));
    };

    let use_case = CheckSessionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    match use_case.execute(&token).await? {
        Some(verified) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            expires_at_ms: Some(verified.session.expires_at_ms),
            user: Some(UserDto::from(verified.user)),
        })),
        None => Ok(Json(anonymous)),
    }
}

// ============================================================================
// Role Verification
// ============================================================================

/// POST /verify-role
///
/// Fails closed: any invalid session is a deny, not an error.
pub async fn verify_role<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<VerifyRoleRequest>,
) -> AuthResult<Json<VerifyRoleResponse>>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    let required = UserRole::from_code(&req.role)
        .ok_or_else(|| AuthError::Validation(format!("Unknown role: {}", req.role)))?;

    let Some(token) = extract_token(&headers, &state.config.session_cookie_name) else {
        return Ok(Json(VerifyRoleResponse {
            has_access: false,
            reason: Some("not_authenticated".to_string()),
        }));
    };

    let use_case = VerifyRoleUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let check = use_case.execute(&token, required).await?;
    Ok(Json(VerifyRoleResponse {
        has_access: check.has_access,
        reason: check.reason,
    }))
}

// ============================================================================
// Admin User Management
// ============================================================================

fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    Uuid::parse_str(raw)
        .map(UserId::from_uuid)
        .map_err(|_| AuthError::Validation("Invalid user id".to_string()))
}

/// PUT /admin/users/role
///
/// Requires the admin gate middleware; the acting admin arrives as a
/// request extension.
pub async fn update_user_role<R>(
    State(state): State<AuthAppState<R>>,
    axum::Extension(admin): axum::Extension<AuthenticatedUser>,
    Json(req): Json<UpdateRoleRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let new_role = UserRole::from_code(&req.role)
        .ok_or_else(|| AuthError::Validation(format!("Unknown role: {}", req.role)))?;

    let acting = parse_user_id(&admin.user_id)?;
    let target = parse_user_id(&req.user_id)?;

    let use_case = ManageUsersUseCase::new(state.repo.clone());
    use_case.update_role(&acting, &target, new_role).await?;

    Ok(Json(MessageResponse {
        message: "Role updated".to_string(),
    }))
}

/// PUT /admin/users/status
pub async fn toggle_user_status<R>(
    State(state): State<AuthAppState<R>>,
    axum::Extension(admin): axum::Extension<AuthenticatedUser>,
    Json(req): Json<ToggleStatusRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let acting = parse_user_id(&admin.user_id)?;
    let target = parse_user_id(&req.user_id)?;

    let use_case = ManageUsersUseCase::new(state.repo.clone());
    let user = use_case.toggle_status(&acting, &target).await?;

    Ok(Json(MessageResponse {
        message: format!("User is now {}", user.user_status),
    }))
}
