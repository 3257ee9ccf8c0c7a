//! Caller roles for report endpoints

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried in the credential list and in issued tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
#[derive(Default)]
pub enum Role {
    /// Can read the grading and install reports
    #[default]
    #[serde(alias = "user")]
    Viewer = 0,
    /// Can also read per-student submission detail
    Admin = 1,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Viewer => write!(f, "viewer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl Role {
    /// Whether this role satisfies `required`
    pub fn allows(self, required: Role) -> bool {
        self >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin > Role::Viewer);
        assert!(Role::Admin.allows(Role::Viewer));
        assert!(Role::Admin.allows(Role::Admin));
        assert!(!Role::Viewer.allows(Role::Admin));
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(serde_json::from_str::<Role>(r#""user""#).unwrap(), Role::Viewer);
        assert_eq!(serde_json::from_str::<Role>(r#""viewer""#).unwrap(), Role::Viewer);
        assert!(serde_json::from_str::<Role>(r#""root""#).is_err());
    }
}
