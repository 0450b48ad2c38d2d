//! Account model for entries of the credential table.

use serde::{Deserialize, Serialize};

/// Role granted to a logged-in user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

/// A known user with display fields for the sidebar profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: &'static str,
    pub display_name: &'static str,
    pub avatar: &'static str,
    pub role: Role,
}
