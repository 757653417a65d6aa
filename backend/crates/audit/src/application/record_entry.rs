//! Record Audit Entry Use Case
//!
//! Library entry point for the subsystems that generate file-activity
//! entries (upload, download, delete, view, update). Those subsystems
//! live outside this workspace and call in through this use case; the
//! HTTP surface of this crate only reads and purges the trail.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::AuditLogEntry;
use crate::domain::repository::AuditLogRepository;
use crate::domain::value_object::AuditAction;
use crate::error::AuditResult;

/// Input for recording one audit entry
pub struct RecordEntryInput {
    pub user_id: Uuid,
    pub subject_id: Option<Uuid>,
    pub action: AuditAction,
    pub success: bool,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub error_detail: Option<String>,
}

/// Record audit entry use case
pub struct RecordAuditEntryUseCase<A>
where
    A: AuditLogRepository,
{
    audit_repo: Arc<A>,
}

impl<A> RecordAuditEntryUseCase<A>
where
    A: AuditLogRepository,
{
    pub fn new(audit_repo: Arc<A>) -> Self {
        Self { audit_repo }
    }

    pub async fn execute(&self, input: RecordEntryInput) -> AuditResult<AuditLogEntry> {
        let entry = AuditLogEntry::new(
            input.user_id,
            input.subject_id,
            input.action,
            input.success,
            input.client_ip,
            input.user_agent,
            input.error_detail,
        );

        self.audit_repo.append(&entry).await?;

        tracing::info!(
            entry_id = %entry.entry_id,
            user_id = %entry.user_id,
            action = %entry.action,
            success = entry.success,
            "Audit entry recorded"
        );

        Ok(entry)
    }
}
