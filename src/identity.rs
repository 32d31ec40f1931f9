//! Current user identity and role.
//!
//! Authentication is someone else's job; the sidebar only asks an
//! [`IdentityProvider`] who is signed in. Before the provider has settled
//! there may be no user at all, which the sidebar renders as an empty list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SidebarError;

/// Role badge shown under the user's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Regular account.
    #[default]
    Member,
    /// Workspace administrator.
    Admin,
    /// Workspace owner.
    Owner,
}

impl Role {
    /// All roles, lowest privilege first.
    pub const ALL: [Role; 3] = [Role::Member, Role::Admin, Role::Owner];

    /// Display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Admin => "Admin",
            Self::Owner => "Owner",
        }
    }

    /// Parse a role name case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SidebarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SidebarError::InvalidArgument {
            name: "role".to_string(),
            reason: format!("unknown role '{s}' (expected Member, Admin or Owner)"),
        })
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable user id; also the preference namespace.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Role reported by the provider, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserIdentity {
    /// Identity with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            image: None,
            role: None,
        }
    }

    /// Builder: set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set the provider role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Avatar fallback: first two characters of the name, upper-cased.
    pub fn initials(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.chars().take(2).collect::<String>().to_uppercase(),
            _ => "US".to_string(),
        }
    }
}

/// Source of the current user.
pub trait IdentityProvider {
    /// Signed-in user, or `None` while unknown.
    fn current_user(&self) -> Option<UserIdentity>;

    /// Current user id; empty when nobody is signed in.
    fn current_user_id(&self) -> String {
        self.current_user().map(|u| u.id).unwrap_or_default()
    }
}

/// Provider with a fixed answer, used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserIdentity>,
}

impl StaticIdentity {
    /// Provider reporting `user`.
    pub fn new(user: UserIdentity) -> Self {
        Self { user: Some(user) }
    }

    /// Provider with nobody signed in.
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::from_name("admin"), Some(Role::Admin));
        assert_eq!(Role::from_name(" OWNER "), Some(Role::Owner));
        assert_eq!(Role::from_name("guest"), None);
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_initials() {
        assert_eq!(UserIdentity::new("1").with_name("ada lovelace").initials(), "AD");
        assert_eq!(UserIdentity::new("1").initials(), "US");
        assert_eq!(UserIdentity::new("1").with_name("  ").initials(), "US");
    }

    #[test]
    fn test_anonymous_provider() {
        let provider = StaticIdentity::anonymous();
        assert!(provider.current_user().is_none());
        assert_eq!(provider.current_user_id(), "");
    }
}
