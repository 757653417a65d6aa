//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use audit::PgAuditRepository;
use auth::application::check_rate_limit::CheckRateLimitUseCase;
use auth::application::config::AuthConfig;
use auth::domain::repository::SessionRepository;
use auth::infra::postgres::PgAuthRepository;
use auth::presentation::guard::{AdminGateState, GuardState, require_admin, route_guard};
use auth::presentation::router::auth_router_generic;
use auth::presentation::security::SecurityEventLog;
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::rate_limit::InMemoryRateLimitStore;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,audit=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = Arc::new(PgAuthRepository::new(pool.clone()));

    // Startup cleanup: expired sessions and stale rate-limit records.
    // Errors here should not prevent server startup.
    match repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }
    if let Err(e) = CheckRateLimitUseCase::new(repo.clone()).sweep().await {
        tracing::warn!(error = %e, "Rate limit sweep failed, continuing anyway");
    }

    // Auth configuration
    let config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        anyhow::ensure!(
            secret_bytes.len() == 32,
            "SESSION_SECRET must decode to exactly 32 bytes"
        );
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AuthConfig {
            session_secret: secret,
            ..AuthConfig::default()
        }
    };
    let config = Arc::new(config);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Admin gate over the audit endpoints
    let admin_gate = AdminGateState {
        repo: repo.clone(),
        config: config.clone(),
    };
    let audit_routes = audit::audit_router(PgAuditRepository::new(pool.clone())).layer(
        middleware::from_fn_with_state(admin_gate, require_admin::<PgAuthRepository>),
    );

    // Route guard over everything
    let guard_state = GuardState {
        repo: repo.clone(),
        config: config.clone(),
        rate_store: Arc::new(InMemoryRateLimitStore::new()),
        events: Arc::new(SecurityEventLog::new(config.suspicious_threshold)),
    };

    // Build router
    let app = Router::new()
        .route("/", get(home_page))
        .route("/auth/login", get(login_page))
        .route("/auth/register", get(register_page))
        .route("/dashboard", get(dashboard_page))
        .route("/admin", get(admin_page))
        .route("/news", get(news_page))
        .route("/privacy-policy", get(privacy_page))
        .route("/setup", get(setup_page))
        .nest("/api/auth", auth_router_generic(repo, config))
        .nest("/api/audit", audit_routes)
        .layer(middleware::from_fn_with_state(
            guard_state,
            route_guard::<PgAuthRepository, InMemoryRateLimitStore>,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(31113);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

// ============================================================================
// Page stubs
//
// Placeholder pages that exercise the guard's public allowlist and
// protected patterns; a real frontend would live elsewhere.
// ============================================================================

async fn home_page() -> &'static str {
    "Community Association"
}

async fn login_page() -> &'static str {
    "Login"
}

async fn register_page() -> &'static str {
    "Register"
}

async fn dashboard_page() -> &'static str {
    "Member Dashboard"
}

async fn admin_page() -> &'static str {
    "Admin Console"
}

async fn news_page() -> &'static str {
    "News"
}

async fn privacy_page() -> &'static str {
    "Privacy Policy"
}

async fn setup_page() -> &'static str {
    "Setup"
}
