//! HTTP Handlers
//!
//! All endpoints here expect to sit behind the auth admin gate: the
//! acting admin arrives as an `AuthenticatedUser` request extension.

use std::sync::Arc;

use auth::presentation::guard::AuthenticatedUser;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::SecurityIncidentId;
use uuid::Uuid;

use crate::application::incidents::{
    AdvanceIncidentUseCase, ListIncidentsUseCase, ReportIncidentInput, ReportIncidentUseCase,
};
use crate::application::list_entries::ListAuditEntriesUseCase;
use crate::application::purge_user::PurgeUserAuditUseCase;
use crate::domain::repository::{AuditLogRepository, IncidentRepository};
use crate::domain::value_object::{IncidentSeverity, IncidentStatus};
use crate::error::{AuditError, AuditResult};
use crate::presentation::dto::{
    AdvanceIncidentRequest, AuditEntryDto, AuditPageResponse, IncidentDto, PageQuery,
    PurgeResponse, ReportIncidentRequest,
};

/// Shared handler state
pub struct AuditAppState<R> {
    pub repo: Arc<R>,
}

impl<R> Clone for AuditAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

fn parse_uuid(raw: &str, what: &str) -> AuditResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AuditError::Validation(format!("Invalid {what}")))
}

fn acting_admin_id(admin: &AuthenticatedUser) -> AuditResult<Uuid> {
    Uuid::parse_str(&admin.user_id)
        .map_err(|_| AuditError::Internal("Malformed admin identity".to_string()))
}

// ============================================================================
// Audit entries
// ============================================================================

/// GET /entries
pub async fn list_entries<R>(
    State(state): State<AuditAppState<R>>,
    Query(query): Query<PageQuery>,
) -> AuditResult<Json<AuditPageResponse>>
where
    R: AuditLogRepository + Send + Sync + 'static,
{
    let use_case = ListAuditEntriesUseCase::new(state.repo.clone());

    let page = match &query.user_id {
        Some(raw) => {
            let user_id = parse_uuid(raw, "user id")?;
            use_case
                .execute_for_user(user_id, query.limit, query.offset)
                .await?
        }
        None => use_case.execute(query.limit, query.offset).await?,
    };

    Ok(Json(AuditPageResponse {
        entries: page.entries.into_iter().map(AuditEntryDto::from).collect(),
        limit: page.limit,
        offset: page.offset,
    }))
}

/// DELETE /users/{user_id}
///
/// GDPR erasure of one user's audit trail.
pub async fn purge_user<R>(
    State(state): State<AuditAppState<R>>,
    axum::Extension(admin): axum::Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> AuditResult<Json<PurgeResponse>>
where
    R: AuditLogRepository + Send + Sync + 'static,
{
    let acting = acting_admin_id(&admin)?;
    let user_id = parse_uuid(&user_id, "user id")?;

    let use_case = PurgeUserAuditUseCase::new(state.repo.clone());
    let removed = use_case.execute(acting, user_id).await?;

    Ok(Json(PurgeResponse { removed }))
}

// ============================================================================
// Incidents
// ============================================================================

/// GET /incidents
pub async fn list_incidents<R>(
    State(state): State<AuditAppState<R>>,
    Query(query): Query<PageQuery>,
) -> AuditResult<Json<Vec<IncidentDto>>>
where
    R: IncidentRepository + Send + Sync + 'static,
{
    let use_case = ListIncidentsUseCase::new(state.repo.clone());
    let incidents = use_case.execute(query.limit, query.offset).await?;

    Ok(Json(incidents.into_iter().map(IncidentDto::from).collect()))
}

/// POST /incidents
pub async fn report_incident<R>(
    State(state): State<AuditAppState<R>>,
    axum::Extension(admin): axum::Extension<AuthenticatedUser>,
    Json(req): Json<ReportIncidentRequest>,
) -> AuditResult<impl IntoResponse>
where
    R: IncidentRepository + Send + Sync + 'static,
{
    let severity = IncidentSeverity::from_code(&req.severity)
        .ok_or_else(|| AuditError::Validation(format!("Unknown severity: {}", req.severity)))?;

    let affected_user = req
        .affected_user
        .as_deref()
        .map(|raw| parse_uuid(raw, "affected user id"))
        .transpose()?;

    let use_case = ReportIncidentUseCase::new(state.repo.clone());
    let incident = use_case
        .execute(ReportIncidentInput {
            incident_type: req.incident_type,
            severity,
            description: req.description,
            reported_by: acting_admin_id(&admin)?,
            affected_user,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(IncidentDto::from(incident))))
}

/// PUT /incidents/{incident_id}/status
pub async fn advance_incident<R>(
    State(state): State<AuditAppState<R>>,
    axum::Extension(admin): axum::Extension<AuthenticatedUser>,
    Path(incident_id): Path<String>,
    Json(req): Json<AdvanceIncidentRequest>,
) -> AuditResult<Json<IncidentDto>>
where
    R: IncidentRepository + Send + Sync + 'static,
{
    let next = IncidentStatus::from_code(&req.status)
        .ok_or_else(|| AuditError::Validation(format!("Unknown status: {}", req.status)))?;
    let incident_id = SecurityIncidentId::from_uuid(parse_uuid(&incident_id, "incident id")?);

    let use_case = AdvanceIncidentUseCase::new(state.repo.clone());
    let incident = use_case
        .execute(acting_admin_id(&admin)?, &incident_id, next)
        .await?;

    Ok(Json(IncidentDto::from(incident)))
}
