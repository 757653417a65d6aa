//! Use-case and router integration tests over an in-memory repository

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use axum::{Router, middleware};
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use platform::rate_limit::InMemoryRateLimitStore;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::application::login::{LoginInput, LoginOutput, LoginUseCase};
use crate::application::logout::LogoutUseCase;
use crate::application::manage_users::ManageUsersUseCase;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::verify_role::VerifyRoleUseCase;
use crate::domain::entity::{credential::Credential, session::Session, user::User};
use crate::domain::repository::{
    CredentialRepository, RateLimitRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};
use crate::presentation::guard::{GuardState, route_guard};
use crate::presentation::router::auth_router_generic;
use crate::presentation::security::SecurityEventLog;

// ============================================================================
// In-memory repository
// ============================================================================

#[derive(Clone, Default)]
struct MemoryRepo {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    credentials: Arc<Mutex<HashMap<Uuid, Credential>>>,
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    attempts: Arc<Mutex<Vec<(String, String, i64)>>>,
}

impl UserRepository for MemoryRepo {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.email == *email))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn count_active_with_role(&self, role: UserRole) -> AuthResult<u64> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.user_role == role && u.can_login())
            .count() as u64)
    }
}

impl CredentialRepository for MemoryRepo {
    async fn create(&self, credential: &Credential) -> AuthResult<()> {
        self.credentials
            .lock()
            .unwrap()
            .insert(*credential.user_id.as_uuid(), credential.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .get(user_id.as_uuid())
            .cloned())
    }

    async fn update(&self, credential: &Credential) -> AuthResult<()> {
        self.credentials
            .lock()
            .unwrap()
            .insert(*credential.user_id.as_uuid(), credential.clone());
        Ok(())
    }
}

impl SessionRepository for MemoryRepo {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(&session_id).cloned())
    }

    async fn update(&self, session: &Session) -> AuthResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn deactivate_all_for_user(&self, user_id: &UserId) -> AuthResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let mut hit = 0;
        for session in sessions.values_mut() {
            if session.user_id == *user_id && session.is_active {
                session.deactivate();
                hit += 1;
            }
        }
        Ok(hit)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        Ok((before - sessions.len()) as u64)
    }
}

impl RateLimitRepository for MemoryRepo {
    async fn count_since(&self, actor_key: &str, action: &str, since_ms: i64) -> AuthResult<u64> {
        Ok(self
            .attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, a, t)| k == actor_key && a == action && *t >= since_ms)
            .count() as u64)
    }

    async fn record(&self, actor_key: &str, action: &str, recorded_at_ms: i64) -> AuthResult<()> {
        self.attempts.lock().unwrap().push((
            actor_key.to_string(),
            action.to_string(),
            recorded_at_ms,
        ));
        Ok(())
    }

    async fn purge_older_than(&self, cutoff_ms: i64) -> AuthResult<u64> {
        let mut attempts = self.attempts.lock().unwrap();
        let before = attempts.len();
        attempts.retain(|(_, _, t)| *t >= cutoff_ms);
        Ok((before - attempts.len()) as u64)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig {
        cookie_secure: false,
        ..AuthConfig::with_random_secret()
    })
}

async fn register(repo: &Arc<MemoryRepo>, config: &Arc<AuthConfig>, email: &str) -> String {
    let use_case = RegisterUseCase::new(repo.clone(), repo.clone(), config.clone());
    use_case
        .execute(RegisterInput {
            email: email.to_string(),
            name: "Test User".to_string(),
            phone: None,
            address: None,
            password: "CorrectHorse1".to_string(),
        })
        .await
        .unwrap()
        .user_id
}

async fn login(
    repo: &Arc<MemoryRepo>,
    config: &Arc<AuthConfig>,
    email: &str,
    password: &str,
) -> AuthResult<LoginOutput> {
    let use_case = LoginUseCase::new(
        repo.clone(),
        repo.clone(),
        repo.clone(),
        repo.clone(),
        config.clone(),
    );
    use_case
        .execute(LoginInput {
            email: email.to_string(),
            password: password.to_string(),
            client_ip: Some("203.0.113.7".to_string()),
            user_agent: Some("test-agent".to_string()),
        })
        .await
}

fn check_session_use_case(
    repo: &Arc<MemoryRepo>,
    config: &Arc<AuthConfig>,
) -> CheckSessionUseCase<MemoryRepo, MemoryRepo> {
    CheckSessionUseCase::new(repo.clone(), repo.clone(), config.clone())
}

fn promote_to_admin(repo: &MemoryRepo, user_id: &str) {
    let uuid = Uuid::parse_str(user_id).unwrap();
    let mut users = repo.users.lock().unwrap();
    users.get_mut(&uuid).unwrap().set_role(UserRole::Admin);
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;
    let output = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap();

    assert!(!output.session_token.is_empty());
    assert_eq!(output.user.email, "alice@example.com");
    assert_eq!(output.user.role, "user");
    assert!(output.expires_at_ms > Utc::now().timestamp_millis());
}

#[tokio::test]
async fn test_duplicate_email_rejected_case_insensitive() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;

    let use_case = RegisterUseCase::new(repo.clone(), repo.clone(), config.clone());
    let result = use_case
        .execute(RegisterInput {
            email: "Alice@Example.COM".to_string(),
            name: "Other Alice".to_string(),
            phone: None,
            address: None,
            password: "AnotherPass1".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AuthError::EmailTaken)));
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let use_case = RegisterUseCase::new(repo.clone(), repo.clone(), config.clone());
    for bad in ["short1A", "alllowercase1", "ALLUPPERCASE1", "NoDigitsHere"] {
        let result = use_case
            .execute(RegisterInput {
                email: "bob@example.com".to_string(),
                name: "Bob".to_string(),
                phone: None,
                address: None,
                password: bad.to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::Validation(_))), "{bad}");
    }
}

// ============================================================================
// Login failures
// ============================================================================

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let user_id = register(&repo, &config, "alice@example.com").await;

    // Unknown email
    let unknown = login(&repo, &config, "nobody@example.com", "CorrectHorse1")
        .await
        .unwrap_err();
    // Wrong password
    let wrong = login(&repo, &config, "alice@example.com", "WrongPass1")
        .await
        .unwrap_err();

    // Disabled account with the correct password
    {
        let uuid = Uuid::parse_str(&user_id).unwrap();
        let mut users = repo.users.lock().unwrap();
        users.get_mut(&uuid).unwrap().toggle_status();
    }
    let disabled = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap_err();

    for err in [&unknown, &wrong, &disabled] {
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(err.status_code().as_u16(), 401);
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_second_login_revokes_prior_session() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;
    let first = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap();
    let second = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap();

    let check = check_session_use_case(&repo, &config);
    assert!(check.execute(&first.session_token).await.unwrap().is_none());
    assert!(check.execute(&second.session_token).await.unwrap().is_some());

    let active = repo
        .sessions
        .lock()
        .unwrap()
        .values()
        .filter(|s| s.is_active)
        .count();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn test_expired_session_invalid_even_if_active() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;
    let output = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap();

    // Force the stored row past its expiry while leaving it active
    let session_id = {
        let mut sessions = repo.sessions.lock().unwrap();
        let session = sessions.values_mut().next().unwrap();
        session.expires_at_ms = Utc::now().timestamp_millis() - 1_000;
        assert!(session.is_active);
        session.session_id
    };

    let check = check_session_use_case(&repo, &config);
    assert!(check.execute(&output.session_token).await.unwrap().is_none());

    // Expired rows are deactivated on read
    let deactivated = !repo.sessions.lock().unwrap()[&session_id].is_active;
    assert!(deactivated);
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;
    let output = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap();

    let mut tampered = output.session_token.clone();
    tampered.pop();
    tampered.push('X');

    let check = check_session_use_case(&repo, &config);
    assert!(check.execute(&tampered).await.unwrap().is_none());
    assert!(check.execute("garbage").await.unwrap().is_none());
}

#[tokio::test]
async fn test_disabled_user_invalidates_session() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let user_id = register(&repo, &config, "alice@example.com").await;
    let output = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap();

    let check = check_session_use_case(&repo, &config);
    assert!(check.execute(&output.session_token).await.unwrap().is_some());

    {
        let uuid = Uuid::parse_str(&user_id).unwrap();
        let mut users = repo.users.lock().unwrap();
        users.get_mut(&uuid).unwrap().toggle_status();
    }

    assert!(check.execute(&output.session_token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;
    let output = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap();

    let logout = LogoutUseCase::new(repo.clone(), config.clone());
    logout.execute(&output.session_token).await.unwrap();

    let check = check_session_use_case(&repo, &config);
    assert!(check.execute(&output.session_token).await.unwrap().is_none());

    // Second logout and garbage tokens are fine
    logout.execute(&output.session_token).await.unwrap();
    logout.execute("not-a-token").await.unwrap();
}

// ============================================================================
// Login rate limiting
// ============================================================================

#[tokio::test]
async fn test_sixth_login_attempt_rejected() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;

    for _ in 0..5 {
        let err = login(&repo, &config, "alice@example.com", "WrongPass1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    // Even the correct password is throttled now
    let err = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::RateLimitExceeded));
    assert_eq!(err.status_code().as_u16(), 429);
}

#[tokio::test]
async fn test_rate_limit_is_per_account() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;
    register(&repo, &config, "bob@example.com").await;

    for _ in 0..5 {
        let _ = login(&repo, &config, "alice@example.com", "WrongPass1").await;
    }

    // Alice is throttled, Bob is not
    assert!(matches!(
        login(&repo, &config, "alice@example.com", "CorrectHorse1").await,
        Err(AuthError::RateLimitExceeded)
    ));
    assert!(
        login(&repo, &config, "bob@example.com", "CorrectHorse1")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_rate_limit_window_slides() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;

    for _ in 0..5 {
        let _ = login(&repo, &config, "alice@example.com", "WrongPass1").await;
    }

    // Age all attempts past the window
    let window_ms = config.login_rate_window_ms();
    {
        let mut attempts = repo.attempts.lock().unwrap();
        for (_, _, t) in attempts.iter_mut() {
            *t -= window_ms + 1_000;
        }
    }

    assert!(
        login(&repo, &config, "alice@example.com", "CorrectHorse1")
            .await
            .is_ok()
    );
}

// ============================================================================
// Role verification
// ============================================================================

#[tokio::test]
async fn test_verify_role_hierarchy() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let user_id = register(&repo, &config, "admin@example.com").await;
    promote_to_admin(&repo, &user_id);
    let output = login(&repo, &config, "admin@example.com", "CorrectHorse1")
        .await
        .unwrap();

    let verify = VerifyRoleUseCase::new(repo.clone(), repo.clone(), config.clone());

    // Admin passes both levels
    let admin_check = verify
        .execute(&output.session_token, UserRole::Admin)
        .await
        .unwrap();
    assert!(admin_check.has_access);
    let user_check = verify
        .execute(&output.session_token, UserRole::User)
        .await
        .unwrap();
    assert!(user_check.has_access);
}

#[tokio::test]
async fn test_verify_role_sees_demotion_immediately() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let user_id = register(&repo, &config, "admin@example.com").await;
    promote_to_admin(&repo, &user_id);
    let output = login(&repo, &config, "admin@example.com", "CorrectHorse1")
        .await
        .unwrap();

    // Demote after login; the session row still carries the old role
    {
        let uuid = Uuid::parse_str(&user_id).unwrap();
        let mut users = repo.users.lock().unwrap();
        users.get_mut(&uuid).unwrap().set_role(UserRole::User);
    }

    let verify = VerifyRoleUseCase::new(repo.clone(), repo.clone(), config.clone());
    let check = verify
        .execute(&output.session_token, UserRole::Admin)
        .await
        .unwrap();

    assert!(!check.has_access);
    assert_eq!(check.reason.as_deref(), Some("insufficient_role"));
}

#[tokio::test]
async fn test_verify_role_without_session() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let verify = VerifyRoleUseCase::new(repo.clone(), repo.clone(), config.clone());
    let check = verify.execute("no-such-token", UserRole::User).await.unwrap();

    assert!(!check.has_access);
    assert_eq!(check.reason.as_deref(), Some("not_authenticated"));
}

// ============================================================================
// Admin user management
// ============================================================================

#[tokio::test]
async fn test_last_admin_cannot_be_demoted_or_disabled() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let admin_id = register(&repo, &config, "admin@example.com").await;
    promote_to_admin(&repo, &admin_id);
    let member_id = register(&repo, &config, "member@example.com").await;

    let other_admin = UserId::from_uuid(Uuid::parse_str(&member_id).unwrap());
    let target = UserId::from_uuid(Uuid::parse_str(&admin_id).unwrap());

    // Acting as a hypothetical second admin targeting the only admin
    let manage = ManageUsersUseCase::new(repo.clone());

    let demote = manage
        .update_role(&other_admin, &target, UserRole::User)
        .await;
    assert!(matches!(demote, Err(AuthError::LastAdmin)));

    let disable = manage.toggle_status(&other_admin, &target).await;
    assert!(matches!(disable, Err(AuthError::LastAdmin)));
}

#[tokio::test]
async fn test_demotion_allowed_with_two_admins() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let first = register(&repo, &config, "one@example.com").await;
    let second = register(&repo, &config, "two@example.com").await;
    promote_to_admin(&repo, &first);
    promote_to_admin(&repo, &second);

    let acting = UserId::from_uuid(Uuid::parse_str(&first).unwrap());
    let target = UserId::from_uuid(Uuid::parse_str(&second).unwrap());

    let manage = ManageUsersUseCase::new(repo.clone());
    manage
        .update_role(&acting, &target, UserRole::User)
        .await
        .unwrap();

    let demoted = repo.users.lock().unwrap()[&target.into_uuid()].user_role;
    assert_eq!(demoted, UserRole::User);
}

#[tokio::test]
async fn test_admin_cannot_target_self() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let admin_id = register(&repo, &config, "admin@example.com").await;
    promote_to_admin(&repo, &admin_id);
    let admin = UserId::from_uuid(Uuid::parse_str(&admin_id).unwrap());

    let manage = ManageUsersUseCase::new(repo.clone());

    assert!(matches!(
        manage.update_role(&admin, &admin, UserRole::User).await,
        Err(AuthError::SelfTarget)
    ));
    assert!(matches!(
        manage.toggle_status(&admin, &admin).await,
        Err(AuthError::SelfTarget)
    ));
}

#[tokio::test]
async fn test_role_change_for_missing_user() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let admin_id = register(&repo, &config, "admin@example.com").await;
    promote_to_admin(&repo, &admin_id);
    let admin = UserId::from_uuid(Uuid::parse_str(&admin_id).unwrap());
    let ghost = UserId::new();

    let manage = ManageUsersUseCase::new(repo.clone());
    assert!(matches!(
        manage.update_role(&admin, &ghost, UserRole::Admin).await,
        Err(AuthError::UserNotFound)
    ));
}

// ============================================================================
// Session cleanup
// ============================================================================

#[tokio::test]
async fn test_cleanup_removes_only_expired_sessions() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "alice@example.com").await;
    let bob_id = register(&repo, &config, "bob@example.com").await;
    let alive = login(&repo, &config, "alice@example.com", "CorrectHorse1")
        .await
        .unwrap();
    let dead = login(&repo, &config, "bob@example.com", "CorrectHorse1")
        .await
        .unwrap();

    // Expire bob's session
    let bob = UserId::from_uuid(Uuid::parse_str(&bob_id).unwrap());
    {
        let mut sessions = repo.sessions.lock().unwrap();
        let session = sessions.values_mut().find(|s| s.user_id == bob).unwrap();
        session.expires_at_ms = Utc::now().timestamp_millis() - 1;
    }

    let removed = SessionRepository::cleanup_expired(repo.as_ref()).await.unwrap();
    assert_eq!(removed, 1);

    let check = check_session_use_case(&repo, &config);
    assert!(check.execute(&alive.session_token).await.unwrap().is_some());
    assert!(check.execute(&dead.session_token).await.unwrap().is_none());
}

// ============================================================================
// Route guard (end to end)
// ============================================================================

/// Page stubs plus the API surface, all behind the route guard, the way
/// the binary mounts them.
fn guarded_app(repo: &Arc<MemoryRepo>, config: &Arc<AuthConfig>) -> Router {
    let guard_state = GuardState {
        repo: repo.clone(),
        config: config.clone(),
        rate_store: Arc::new(InMemoryRateLimitStore::new()),
        events: Arc::new(SecurityEventLog::new(config.suspicious_threshold)),
    };

    Router::new()
        .route("/admin", get(|| async { "admin console" }))
        .route("/dashboard", get(|| async { "member dashboard" }))
        .nest("/api/auth", auth_router_generic(repo.clone(), config.clone()))
        .layer(middleware::from_fn_with_state(
            guard_state,
            route_guard::<MemoryRepo, InMemoryRateLimitStore>,
        ))
}

fn get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("sessionToken={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_guard_redirects_anonymous_to_login() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();
    let app = guarded_app(&repo, &config);

    let response = app.oneshot(get_request("/admin", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?redirect=/admin"
    );
    // Every guard exit carries the security and rate-limit headers
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().contains_key("X-RateLimit-Remaining"));
}

#[tokio::test]
async fn test_guard_redirects_user_role_away_from_admin() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    register(&repo, &config, "member@example.com").await;
    let output = login(&repo, &config, "member@example.com", "CorrectHorse1")
        .await
        .unwrap();

    let app = guarded_app(&repo, &config);
    let response = app
        .oneshot(get_request("/admin", Some(&output.session_token)))
        .await
        .unwrap();

    // Unauthorized, not unauthenticated: landing page, not login
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/dashboard"
    );
}

#[tokio::test]
async fn test_guard_passes_admin_and_stamps_identity() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let admin_id = register(&repo, &config, "admin@example.com").await;
    promote_to_admin(&repo, &admin_id);
    let output = login(&repo, &config, "admin@example.com", "CorrectHorse1")
        .await
        .unwrap();

    let app = guarded_app(&repo, &config);
    let response = app
        .oneshot(get_request("/admin", Some(&output.session_token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("X-User-Role").unwrap(), "admin");
    assert_eq!(response.headers().get("X-Auth-Validated").unwrap(), "true");
    assert_eq!(response.headers().get("X-User-ID").unwrap(), &admin_id);
}

#[tokio::test]
async fn test_guard_clears_cookie_on_invalid_token() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();
    let app = guarded_app(&repo, &config);

    let response = app
        .oneshot(get_request("/dashboard", Some("garbage-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?redirect=/dashboard"
    );
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("sessionToken=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_through_router_then_admin_access() {
    let repo = Arc::new(MemoryRepo::default());
    let config = test_config();

    let admin_id = register(&repo, &config, "admin@example.com").await;
    promote_to_admin(&repo, &admin_id);

    let app = guarded_app(&repo, &config);

    // /api/auth is on the public allowlist; login sets the session cookie
    let body = serde_json::json!({
        "email": "admin@example.com",
        "password": "CorrectHorse1",
    });
    let login_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(login_response.status(), StatusCode::OK);

    let set_cookie = login_response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    let token = set_cookie
        .strip_prefix("sessionToken=")
        .and_then(|rest| rest.split(';').next())
        .unwrap()
        .to_string();

    let response = app
        .oneshot(get_request("/admin", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("X-User-Role").unwrap(), "admin");
}
