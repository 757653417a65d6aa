//! Audit Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// AuditAction
// ============================================================================

/// Security-relevant action recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum AuditAction {
    Upload = 0,
    Download = 1,
    Delete = 2,
    View = 3,
    Update = 4,
}

impl AuditAction {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AuditAction::Upload => "upload",
            AuditAction::Download => "download",
            AuditAction::Delete => "delete",
            AuditAction::View => "view",
            AuditAction::Update => "update",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(AuditAction::Upload),
            1 => Some(AuditAction::Download),
            2 => Some(AuditAction::Delete),
            3 => Some(AuditAction::View),
            4 => Some(AuditAction::Update),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "upload" => Some(AuditAction::Upload),
            "download" => Some(AuditAction::Download),
            "delete" => Some(AuditAction::Delete),
            "view" => Some(AuditAction::View),
            "update" => Some(AuditAction::Update),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// IncidentSeverity
// ============================================================================

/// Incident severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum IncidentSeverity {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

impl IncidentSeverity {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            IncidentSeverity::Low => "low",
            IncidentSeverity::Medium => "medium",
            IncidentSeverity::High => "high",
            IncidentSeverity::Critical => "critical",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(IncidentSeverity::Low),
            1 => Some(IncidentSeverity::Medium),
            2 => Some(IncidentSeverity::High),
            3 => Some(IncidentSeverity::Critical),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "low" => Some(IncidentSeverity::Low),
            "medium" => Some(IncidentSeverity::Medium),
            "high" => Some(IncidentSeverity::High),
            "critical" => Some(IncidentSeverity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// IncidentStatus
// ============================================================================

/// Incident lifecycle status
///
/// Transitions only move forward: open -> investigating -> resolved ->
/// closed (intermediate steps may be skipped, but never reversed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum IncidentStatus {
    Open = 0,
    Investigating = 1,
    Resolved = 2,
    Closed = 3,
}

impl IncidentStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Closed => "closed",
        }
    }

    /// Whether the incident is settled (resolved or closed)
    #[inline]
    pub const fn is_settled(&self) -> bool {
        matches!(self, IncidentStatus::Resolved | IncidentStatus::Closed)
    }

    /// Forward-only transition rule
    #[inline]
    pub fn can_transition_to(&self, next: IncidentStatus) -> bool {
        next.id() > self.id()
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(IncidentStatus::Open),
            1 => Some(IncidentStatus::Investigating),
            2 => Some(IncidentStatus::Resolved),
            3 => Some(IncidentStatus::Closed),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "open" => Some(IncidentStatus::Open),
            "investigating" => Some(IncidentStatus::Investigating),
            "resolved" => Some(IncidentStatus::Resolved),
            "closed" => Some(IncidentStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
