//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{AuditEntryId, SecurityIncidentId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{AuditLogEntry, SecurityIncident};
use crate::domain::repository::{AuditLogRepository, IncidentRepository};
use crate::domain::value_object::{AuditAction, IncidentSeverity, IncidentStatus};
use crate::error::{AuditError, AuditResult};

/// PostgreSQL-backed audit repository
#[derive(Clone)]
pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Audit Log Repository Implementation
// ============================================================================

impl AuditLogRepository for PgAuditRepository {
    async fn append(&self, entry: &AuditLogEntry) -> AuditResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (
                entry_id,
                user_id,
                subject_id,
                action,
                success,
                client_ip,
                user_agent,
                error_detail,
                recorded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.entry_id.as_uuid())
        .bind(entry.user_id)
        .bind(entry.subject_id)
        .bind(entry.action.id())
        .bind(entry.success)
        .bind(&entry.client_ip)
        .bind(&entry.user_agent)
        .bind(&entry.error_detail)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> AuditResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT
                entry_id, user_id, subject_id, action, success,
                client_ip, user_agent, error_detail, recorded_at
            FROM audit_log
            ORDER BY recorded_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_entry()).collect()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AuditResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT
                entry_id, user_id, subject_id, action, success,
                client_ip, user_agent, error_detail, recorded_at
            FROM audit_log
            WHERE user_id = $1
            ORDER BY recorded_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_entry()).collect()
    }

    async fn purge_user(&self, user_id: Uuid) -> AuditResult<u64> {
        let result = sqlx::query("DELETE FROM audit_log WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Incident Repository Implementation
// ============================================================================

impl IncidentRepository for PgAuditRepository {
    async fn create(&self, incident: &SecurityIncident) -> AuditResult<()> {
        sqlx::query(
            r#"
            INSERT INTO security_incidents (
                incident_id,
                incident_type,
                severity,
                description,
                reported_by,
                affected_user,
                status,
                created_at,
                updated_at,
                resolved_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(incident.incident_id.as_uuid())
        .bind(&incident.incident_type)
        .bind(incident.severity.id())
        .bind(&incident.description)
        .bind(incident.reported_by)
        .bind(incident.affected_user)
        .bind(incident.status.id())
        .bind(incident.created_at)
        .bind(incident.updated_at)
        .bind(incident.resolved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        incident_id: &SecurityIncidentId,
    ) -> AuditResult<Option<SecurityIncident>> {
        let row = sqlx::query_as::<_, IncidentRow>(
            r#"
            SELECT
                incident_id, incident_type, severity, description,
                reported_by, affected_user, status,
                created_at, updated_at, resolved_at
            FROM security_incidents
            WHERE incident_id = $1
            "#,
        )
        .bind(incident_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_incident()).transpose()
    }

    async fn update(&self, incident: &SecurityIncident) -> AuditResult<()> {
        sqlx::query(
            r#"
            UPDATE security_incidents SET
                status = $2,
                updated_at = $3,
                resolved_at = $4
            WHERE incident_id = $1
            "#,
        )
        .bind(incident.incident_id.as_uuid())
        .bind(incident.status.id())
        .bind(incident.updated_at)
        .bind(incident.resolved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> AuditResult<Vec<SecurityIncident>> {
        let rows = sqlx::query_as::<_, IncidentRow>(
            r#"
            SELECT
                incident_id, incident_type, severity, description,
                reported_by, affected_user, status,
                created_at, updated_at, resolved_at
            FROM security_incidents
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_incident()).collect()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AuditRow {
    entry_id: Uuid,
    user_id: Uuid,
    subject_id: Option<Uuid>,
    action: i16,
    success: bool,
    client_ip: Option<String>,
    user_agent: Option<String>,
    error_detail: Option<String>,
    recorded_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self) -> AuditResult<AuditLogEntry> {
        let action = AuditAction::from_id(self.action)
            .ok_or_else(|| AuditError::Internal(format!("Unknown audit action: {}", self.action)))?;

        Ok(AuditLogEntry {
            entry_id: AuditEntryId::from_uuid(self.entry_id),
            user_id: self.user_id,
            subject_id: self.subject_id,
            action,
            success: self.success,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            error_detail: self.error_detail,
            recorded_at: self.recorded_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct IncidentRow {
    incident_id: Uuid,
    incident_type: String,
    severity: i16,
    description: String,
    reported_by: Uuid,
    affected_user: Option<Uuid>,
    status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl IncidentRow {
    fn into_incident(self) -> AuditResult<SecurityIncident> {
        let severity = IncidentSeverity::from_id(self.severity).ok_or_else(|| {
            AuditError::Internal(format!("Unknown incident severity: {}", self.severity))
        })?;
        let status = IncidentStatus::from_id(self.status).ok_or_else(|| {
            AuditError::Internal(format!("Unknown incident status: {}", self.status))
        })?;

        Ok(SecurityIncident {
            incident_id: SecurityIncidentId::from_uuid(self.incident_id),
            incident_type: self.incident_type,
            severity,
            description: self.description,
            reported_by: self.reported_by,
            affected_user: self.affected_user,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            resolved_at: self.resolved_at,
        })
    }
}
