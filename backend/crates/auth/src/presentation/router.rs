//! Auth Router
//!
//! Wires the handlers to their routes. The generic constructor exists
//! so integration tests can mount the same surface over in-memory
//! repositories.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Router, middleware};

use crate::application::config::AuthConfig;
use crate::domain::repository::{
    CredentialRepository, RateLimitRepository, SessionRepository, UserRepository,
};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::guard::{AdminGateState, require_admin};
use crate::presentation::handlers::{self, AuthAppState};

/// Build the auth router over Postgres
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(Arc::new(repo), Arc::new(config))
}

/// Build the auth router over any repository implementation
pub fn auth_router_generic<R>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository
        + CredentialRepository
        + SessionRepository
        + RateLimitRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = AuthAppState {
        repo: repo.clone(),
        config: config.clone(),
    };
    let admin_gate = AdminGateState { repo, config };

    let admin_routes = Router::new()
        .route("/users/role", put(handlers::update_user_role::<R>))
        .route("/users/status", put(handlers::toggle_user_status::<R>))
        .layer(middleware::from_fn_with_state(
            admin_gate,
            require_admin::<R>,
        ))
        .with_state(state.clone());

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .route("/verify-role", post(handlers::verify_role::<R>))
        .with_state(state)
        .nest("/admin", admin_routes)
}
