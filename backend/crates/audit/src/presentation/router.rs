//! Audit Router
//!
//! The returned router carries no authentication of its own; the binary
//! mounts it behind the auth crate's admin gate middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, put};

use crate::domain::repository::{AuditLogRepository, IncidentRepository};
use crate::infra::postgres::PgAuditRepository;
use crate::presentation::handlers::{self, AuditAppState};

/// Build the audit router over Postgres
pub fn audit_router(repo: PgAuditRepository) -> Router {
    audit_router_generic(Arc::new(repo))
}

/// Build the audit router over any repository implementation
pub fn audit_router_generic<R>(repo: Arc<R>) -> Router
where
    R: AuditLogRepository + IncidentRepository + Send + Sync + 'static,
{
    let state = AuditAppState { repo };

    Router::new()
        .route("/entries", get(handlers::list_entries::<R>))
        .route("/users/{user_id}", delete(handlers::purge_user::<R>))
        .route(
            "/incidents",
            get(handlers::list_incidents::<R>).post(handlers::report_incident::<R>),
        )
        .route(
            "/incidents/{incident_id}/status",
            put(handlers::advance_incident::<R>),
        )
        .with_state(state)
}
