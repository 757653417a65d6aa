//! Client-Side Auth State
//!
//! State machine and role-verification cache consumed by UI frontends.
//! Nothing in this module is authoritative: the route guard re-checks
//! every request server-side, and this layer only decides what the
//! client should render while it waits.

pub mod role_cache;
pub mod state;
pub mod verifier;

pub use role_cache::{CachedVerdict, RoleVerificationCache};
pub use state::{AuthFailure, AuthState, RecoveryStrategy};
pub use verifier::{ClientRoleVerifier, ServerRoleCheck};
