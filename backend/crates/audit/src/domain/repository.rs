//! Repository Traits

use kernel::id::SecurityIncidentId;
use uuid::Uuid;

use crate::domain::entity::{AuditLogEntry, SecurityIncident};
use crate::error::AuditResult;

/// Audit log repository trait (append-only)
#[trait_variant::make(AuditLogRepository: Send)]
pub trait LocalAuditLogRepository {
    /// Append one entry
    async fn append(&self, entry: &AuditLogEntry) -> AuditResult<()>;

    /// List entries newest-first
    async fn list(&self, limit: i64, offset: i64) -> AuditResult<Vec<AuditLogEntry>>;

    /// List entries for one user newest-first
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AuditResult<Vec<AuditLogEntry>>;

    /// Delete all entries for a user (GDPR erasure), returning how many
    async fn purge_user(&self, user_id: Uuid) -> AuditResult<u64>;
}

/// Security incident repository trait
#[trait_variant::make(IncidentRepository: Send)]
pub trait LocalIncidentRepository {
    /// Create a new incident
    async fn create(&self, incident: &SecurityIncident) -> AuditResult<()>;

    /// Find incident by ID
    async fn find_by_id(&self, incident_id: &SecurityIncidentId)
    -> AuditResult<Option<SecurityIncident>>;

    /// Update incident (status advance)
    async fn update(&self, incident: &SecurityIncident) -> AuditResult<()>;

    /// List incidents newest-first
    async fn list(&self, limit: i64, offset: i64) -> AuditResult<Vec<SecurityIncident>>;
}
