//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, route guard
//! - `client/` - Client-side auth state machine and role cache
//!
//! ## Features
//! - User registration/login with email + password
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Role-based access (User, Admin) with last-admin protection
//! - Sliding-window login rate limiting
//! - Route guard with security headers and suspicious-activity tracking
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - One active session per user; login revokes prior sessions
//! - Generic "invalid email or password" on every login failure
//! - Session validity checked server-side on every guarded request

pub mod application;
pub mod client;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod guard {
    pub use crate::presentation::guard::*;
}
