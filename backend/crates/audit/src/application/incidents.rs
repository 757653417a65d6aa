//! Security Incident Use Cases
//!
//! Reporting, listing and forward-only status advancement.

use std::sync::Arc;

use kernel::id::SecurityIncidentId;
use uuid::Uuid;

use crate::domain::entity::SecurityIncident;
use crate::domain::repository::IncidentRepository;
use crate::domain::value_object::{IncidentSeverity, IncidentStatus};
use crate::error::{AuditError, AuditResult};

const TYPE_MAX_LENGTH: usize = 100;
const DESCRIPTION_MAX_LENGTH: usize = 2_000;

/// Input for reporting an incident
pub struct ReportIncidentInput {
    pub incident_type: String,
    pub severity: IncidentSeverity,
    pub description: String,
    pub reported_by: Uuid,
    pub affected_user: Option<Uuid>,
}

/// Report incident use case
pub struct ReportIncidentUseCase<I>
where
    I: IncidentRepository,
{
    incident_repo: Arc<I>,
}

impl<I> ReportIncidentUseCase<I>
where
    I: IncidentRepository,
{
    pub fn new(incident_repo: Arc<I>) -> Self {
        Self { incident_repo }
    }

    pub async fn execute(&self, input: ReportIncidentInput) -> AuditResult<SecurityIncident> {
        let incident_type = input.incident_type.trim().to_string();
        if incident_type.is_empty() || incident_type.chars().count() > TYPE_MAX_LENGTH {
            return Err(AuditError::Validation(
                "Incident type must be 1-100 characters".to_string(),
            ));
        }

        let description = input.description.trim().to_string();
        if description.is_empty() || description.chars().count() > DESCRIPTION_MAX_LENGTH {
            return Err(AuditError::Validation(
                "Description must be 1-2000 characters".to_string(),
            ));
        }

        let incident = SecurityIncident::new(
            incident_type,
            input.severity,
            description,
            input.reported_by,
            input.affected_user,
        );

        self.incident_repo.create(&incident).await?;

        tracing::warn!(
            incident_id = %incident.incident_id,
            incident_type = %incident.incident_type,
            severity = %incident.severity,
            "Security incident reported"
        );

        Ok(incident)
    }
}

/// Advance incident use case
pub struct AdvanceIncidentUseCase<I>
where
    I: IncidentRepository,
{
    incident_repo: Arc<I>,
}

impl<I> AdvanceIncidentUseCase<I>
where
    I: IncidentRepository,
{
    pub fn new(incident_repo: Arc<I>) -> Self {
        Self { incident_repo }
    }

    /// Move an incident to `next` (forward-only), persisting on success
    pub async fn execute(
        &self,
        acting_admin: Uuid,
        incident_id: &SecurityIncidentId,
        next: IncidentStatus,
    ) -> AuditResult<SecurityIncident> {
        let mut incident = self
            .incident_repo
            .find_by_id(incident_id)
            .await?
            .ok_or(AuditError::IncidentNotFound)?;

        incident.advance(next)?;
        self.incident_repo.update(&incident).await?;

        tracing::info!(
            admin_id = %acting_admin,
            incident_id = %incident.incident_id,
            status = %incident.status,
            "Incident status advanced"
        );

        Ok(incident)
    }
}

/// List incidents use case
pub struct ListIncidentsUseCase<I>
where
    I: IncidentRepository,
{
    incident_repo: Arc<I>,
}

impl<I> ListIncidentsUseCase<I>
where
    I: IncidentRepository,
{
    pub fn new(incident_repo: Arc<I>) -> Self {
        Self { incident_repo }
    }

    /// List incidents newest-first
    pub async fn execute(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AuditResult<Vec<SecurityIncident>> {
        let limit = limit.unwrap_or(50).clamp(1, 100);
        let offset = offset.unwrap_or(0).max(0);
        self.incident_repo.list(limit, offset).await
    }
}
