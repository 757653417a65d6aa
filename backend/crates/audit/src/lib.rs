//! Audit Backend Module
//!
//! Append-only audit trail of security-relevant actions plus a security
//! incident register with a forward-only lifecycle.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - Admin-only HTTP endpoints
//!
//! Entries are only ever inserted or bulk-deleted per user (GDPR);
//! nothing updates a recorded entry.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use error::{AuditError, AuditResult};
pub use infra::postgres::PgAuditRepository;
pub use presentation::router::audit_router;
