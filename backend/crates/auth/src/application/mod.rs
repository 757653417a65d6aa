//! Application Layer
//!
//! Use cases and application services.

pub mod check_rate_limit;
pub mod check_session;
pub mod config;
pub mod login;
pub mod logout;
pub mod manage_users;
pub mod register;
pub mod token;
pub mod verify_role;

// Re-exports
pub use check_rate_limit::CheckRateLimitUseCase;
pub use check_session::{CheckSessionUseCase, VerifiedSession};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase, UserProfile};
pub use logout::LogoutUseCase;
pub use manage_users::ManageUsersUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use verify_role::{RoleCheck, VerifyRoleUseCase};
