//! User Entity
//!
//! Core member profile entity containing non-sensitive user data.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_role::UserRole, user_status::UserStatus,
};

/// User entity
///
/// Contains member profile information.
/// The password hash lives in the Credential entity.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Email address (unique, lowercase, used for login)
    pub email: Email,
    /// Display name
    pub name: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional postal address
    pub address: Option<String>,
    /// Role (User, Admin)
    pub user_role: UserRole,
    /// Status (Active, Disabled)
    pub user_status: UserStatus,
    /// Whether the email address has been verified
    pub email_verified: bool,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    ///
    /// New accounts start as Active, role User, email unverified.
    pub fn new(email: Email, name: String, phone: Option<String>, address: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            name,
            phone,
            address,
            user_role: UserRole::default(),
            user_status: UserStatus::default(),
            email_verified: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Check if user can login
    pub fn can_login(&self) -> bool {
        self.user_status.can_login()
    }

    /// Check if user is an active admin
    pub fn is_active_admin(&self) -> bool {
        self.user_role.is_admin() && self.user_status.can_login()
    }

    /// Update user role
    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }

    /// Flip the account status (active <-> disabled)
    pub fn toggle_status(&mut self) {
        self.user_status = self.user_status.toggled();
        self.updated_at = Utc::now();
    }
}
