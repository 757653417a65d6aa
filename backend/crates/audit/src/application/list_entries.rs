//! List Audit Entries Use Case
//!
//! Newest-first, paginated. Admin access is enforced by the router's
//! gate middleware, not here.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::AuditLogEntry;
use crate::domain::repository::AuditLogRepository;
use crate::error::AuditResult;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

/// One page of audit entries
pub struct AuditPage {
    pub entries: Vec<AuditLogEntry>,
    pub limit: i64,
    pub offset: i64,
}

/// List audit entries use case
pub struct ListAuditEntriesUseCase<A>
where
    A: AuditLogRepository,
{
    audit_repo: Arc<A>,
}

impl<A> ListAuditEntriesUseCase<A>
where
    A: AuditLogRepository,
{
    pub fn new(audit_repo: Arc<A>) -> Self {
        Self { audit_repo }
    }

    /// List all entries newest-first
    pub async fn execute(&self, limit: Option<i64>, offset: Option<i64>) -> AuditResult<AuditPage> {
        let (limit, offset) = clamp_page(limit, offset);
        let entries = self.audit_repo.list(limit, offset).await?;
        Ok(AuditPage {
            entries,
            limit,
            offset,
        })
    }

    /// List one user's entries newest-first
    pub async fn execute_for_user(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AuditResult<AuditPage> {
        let (limit, offset) = clamp_page(limit, offset);
        let entries = self.audit_repo.list_for_user(user_id, limit, offset).await?;
        Ok(AuditPage {
            entries,
            limit,
            offset,
        })
    }
}

fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}
