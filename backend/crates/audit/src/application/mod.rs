//! Audit Application Layer

pub mod incidents;
pub mod list_entries;
pub mod purge_user;
pub mod record_entry;

pub use incidents::{AdvanceIncidentUseCase, ListIncidentsUseCase, ReportIncidentUseCase};
pub use list_entries::ListAuditEntriesUseCase;
pub use purge_user::PurgeUserAuditUseCase;
pub use record_entry::RecordAuditEntryUseCase;
