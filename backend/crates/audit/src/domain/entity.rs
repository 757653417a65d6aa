//! Audit Entities

use chrono::{DateTime, Utc};
use kernel::id::{AuditEntryId, SecurityIncidentId};
use uuid::Uuid;

use crate::domain::value_object::{AuditAction, IncidentSeverity, IncidentStatus};
use crate::error::{AuditError, AuditResult};

// ============================================================================
// AuditLogEntry
// ============================================================================

/// One audit trail record
///
/// Append-only: entries are inserted and (for GDPR erasure) bulk-deleted
/// per user, never updated.
#[derive(Debug, Clone)]
pub struct AuditLogEntry {
    pub entry_id: AuditEntryId,
    /// Acting user
    pub user_id: Uuid,
    /// Optional subject of the action (e.g. a file)
    pub subject_id: Option<Uuid>,
    pub action: AuditAction,
    pub success: bool,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    /// Failure detail (absent on success)
    pub error_detail: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(
        user_id: Uuid,
        subject_id: Option<Uuid>,
        action: AuditAction,
        success: bool,
        client_ip: Option<String>,
        user_agent: Option<String>,
        error_detail: Option<String>,
    ) -> Self {
        Self {
            entry_id: AuditEntryId::new(),
            user_id,
            subject_id,
            action,
            success,
            client_ip,
            user_agent,
            // Only failures carry detail
            error_detail: if success { None } else { error_detail },
            recorded_at: Utc::now(),
        }
    }
}

// ============================================================================
// SecurityIncident
// ============================================================================

/// A security incident under investigation
#[derive(Debug, Clone)]
pub struct SecurityIncident {
    pub incident_id: SecurityIncidentId,
    /// Free-form category, e.g. "brute_force", "suspicious_activity"
    pub incident_type: String,
    pub severity: IncidentSeverity,
    pub description: String,
    /// Reporting user (admin or automated detector account)
    pub reported_by: Uuid,
    pub affected_user: Option<Uuid>,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl SecurityIncident {
    /// Create a new open incident
    pub fn new(
        incident_type: String,
        severity: IncidentSeverity,
        description: String,
        reported_by: Uuid,
        affected_user: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            incident_id: SecurityIncidentId::new(),
            incident_type,
            severity,
            description,
            reported_by,
            affected_user,
            status: IncidentStatus::Open,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    /// Advance the incident status (forward-only)
    pub fn advance(&mut self, next: IncidentStatus) -> AuditResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AuditError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        let now = Utc::now();
        self.status = next;
        self.updated_at = now;
        if next.is_settled() && self.resolved_at.is_none() {
            self.resolved_at = Some(now);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_incident() -> SecurityIncident {
        SecurityIncident::new(
            "brute_force".to_string(),
            IncidentSeverity::High,
            "Repeated failed logins from one IP".to_string(),
            Uuid::new_v4(),
            None,
        )
    }

    #[test]
    fn test_failure_detail_dropped_on_success() {
        let entry = AuditLogEntry::new(
            Uuid::new_v4(),
            None,
            AuditAction::Upload,
            true,
            None,
            None,
            Some("should be dropped".to_string()),
        );
        assert!(entry.error_detail.is_none());

        let failed = AuditLogEntry::new(
            Uuid::new_v4(),
            None,
            AuditAction::Upload,
            false,
            None,
            None,
            Some("quota exceeded".to_string()),
        );
        assert_eq!(failed.error_detail.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_incident_lifecycle() {
        let mut incident = sample_incident();
        assert_eq!(incident.status, IncidentStatus::Open);
        assert!(incident.resolved_at.is_none());

        incident.advance(IncidentStatus::Investigating).unwrap();
        assert!(incident.resolved_at.is_none());

        incident.advance(IncidentStatus::Resolved).unwrap();
        assert!(incident.resolved_at.is_some());

        let resolved_at = incident.resolved_at;
        incident.advance(IncidentStatus::Closed).unwrap();
        // First settlement timestamp is kept
        assert_eq!(incident.resolved_at, resolved_at);
    }

    #[test]
    fn test_incident_backward_transition_rejected() {
        let mut incident = sample_incident();
        incident.advance(IncidentStatus::Resolved).unwrap();

        let err = incident.advance(IncidentStatus::Investigating).unwrap_err();
        assert!(matches!(err, AuditError::InvalidTransition { .. }));
        // No state change on rejection
        assert_eq!(incident.status, IncidentStatus::Resolved);
    }
}
