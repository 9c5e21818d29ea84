//! Screen identifier enum.

use std::fmt;

use stowage_core::Role;

/// Identifies each primary TUI screen. Unlike a tabbed interface, the
/// active screen is decided by the session role, not by navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Login,
    Admin,
    User,
}

impl ScreenId {
    /// The screen a role lands on after login.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Guest => Self::Login,
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Admin => "Admin Dashboard",
            Self::User => "My Packages",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_to_screens() {
        assert_eq!(ScreenId::for_role(Role::Guest), ScreenId::Login);
        assert_eq!(ScreenId::for_role(Role::Admin), ScreenId::Admin);
        assert_eq!(ScreenId::for_role(Role::User), ScreenId::User);
    }
}
