//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, route guard and security headers.

pub mod dto;
pub mod guard;
pub mod handlers;
pub mod router;
pub mod security;

pub use guard::{AdminGateState, AuthenticatedUser, GuardState, require_admin, route_guard};
pub use handlers::AuthAppState;
pub use router::{auth_router, auth_router_generic};
pub use security::SecurityEventLog;
