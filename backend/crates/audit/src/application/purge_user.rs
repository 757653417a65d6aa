//! Purge User Audit Use Case
//!
//! GDPR erasure: bulk-deletes every audit entry for one user. This is
//! the only deletion the append-only trail permits.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repository::AuditLogRepository;
use crate::error::AuditResult;

/// Purge user audit use case
pub struct PurgeUserAuditUseCase<A>
where
    A: AuditLogRepository,
{
    audit_repo: Arc<A>,
}

impl<A> PurgeUserAuditUseCase<A>
where
    A: AuditLogRepository,
{
    pub fn new(audit_repo: Arc<A>) -> Self {
        Self { audit_repo }
    }

    /// Delete all entries for `user_id`, returning how many were removed
    pub async fn execute(&self, acting_admin: Uuid, user_id: Uuid) -> AuditResult<u64> {
        let removed = self.audit_repo.purge_user(user_id).await?;

        tracing::info!(
            admin_id = %acting_admin,
            user_id = %user_id,
            removed,
            "Audit entries purged for user"
        );

        Ok(removed)
    }
}
