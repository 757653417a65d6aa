//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::{AuditLogEntry, SecurityIncident};

/// Audit entry projection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryDto {
    pub entry_id: String,
    pub user_id: String,
    pub subject_id: Option<String>,
    pub action: String,
    pub success: bool,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub error_detail: Option<String>,
    pub recorded_at: String,
}

impl From<AuditLogEntry> for AuditEntryDto {
    fn from(e: AuditLogEntry) -> Self {
        Self {
            entry_id: e.entry_id.to_string(),
            user_id: e.user_id.to_string(),
            subject_id: e.subject_id.map(|id| id.to_string()),
            action: e.action.code().to_string(),
            success: e.success,
            client_ip: e.client_ip,
            user_agent: e.user_agent,
            error_detail: e.error_detail,
            recorded_at: e.recorded_at.to_rfc3339(),
        }
    }
}

/// Incident projection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDto {
    pub incident_id: String,
    pub incident_type: String,
    pub severity: String,
    pub description: String,
    pub reported_by: String,
    pub affected_user: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub resolved_at: Option<String>,
}

impl From<SecurityIncident> for IncidentDto {
    fn from(i: SecurityIncident) -> Self {
        Self {
            incident_id: i.incident_id.to_string(),
            incident_type: i.incident_type,
            severity: i.severity.code().to_string(),
            description: i.description,
            reported_by: i.reported_by.to_string(),
            affected_user: i.affected_user.map(|id| id.to_string()),
            status: i.status.code().to_string(),
            created_at: i.created_at.to_rfc3339(),
            updated_at: i.updated_at.to_rfc3339(),
            resolved_at: i.resolved_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Optional filter: only this user's entries
    pub user_id: Option<String>,
}

/// One page of audit entries
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPageResponse {
    pub entries: Vec<AuditEntryDto>,
    pub limit: i64,
    pub offset: i64,
}

/// Incident report request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportIncidentRequest {
    pub incident_type: String,
    /// "low" | "medium" | "high" | "critical"
    pub severity: String,
    pub description: String,
    pub affected_user: Option<String>,
}

/// Incident status advance request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceIncidentRequest {
    /// "investigating" | "resolved" | "closed"
    pub status: String,
}

/// Purge result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    pub removed: u64,
}
