use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    User = 0,
    Admin = 1,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Role hierarchy rule: admin grants everything a user can do.
    ///
    /// - required `Admin` passes only for `Admin`
    /// - required `User` passes for `User` and `Admin`
    #[inline]
    pub const fn grants(&self, required: UserRole) -> bool {
        match required {
            UserRole::Admin => self.is_admin(),
            UserRole::User => true,
        }
    }

    /// Landing page after login / on unauthorized access for this role
    #[inline]
    pub const fn landing_path(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin",
            UserRole::User => "/dashboard",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(UserRole::User),
            1 => Some(UserRole::Admin),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), Some(UserRole::User));
        assert_eq!(UserRole::from_id(1), Some(UserRole::Admin));
        assert_eq!(UserRole::from_id(99), None);
    }

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("user"), Some(UserRole::User));
        assert_eq!(UserRole::from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("moderator"), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::User.to_string(), "user");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_grants_hierarchy() {
        // Admin is a superset of user
        assert!(UserRole::Admin.grants(UserRole::Admin));
        assert!(UserRole::Admin.grants(UserRole::User));
        assert!(UserRole::User.grants(UserRole::User));
        assert!(!UserRole::User.grants(UserRole::Admin));
    }

    #[test]
    fn test_landing_path() {
        assert_eq!(UserRole::Admin.landing_path(), "/admin");
        assert_eq!(UserRole::User.landing_path(), "/dashboard");
    }
}
