//! Audit Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{AuditLogEntry, SecurityIncident};
pub use repository::{AuditLogRepository, IncidentRepository};
pub use value_object::{AuditAction, IncidentSeverity, IncidentStatus};
