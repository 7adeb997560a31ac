/// Name of the built-in administrator role.
pub const ADMINISTRATOR_ROLE_NAME: &str = "admin";


/// Roles that always exist.
///
/// Built-in roles are seeded into the identity store on startup, before any
/// user-created role, so they always come first when listing roles.
/// Apart from that they are ordinary roles: they can be assigned to users
/// and their description can be edited.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum BuiltinRole {
    /// Grants access to all user and role management endpoints.
    Administrator,
}

impl BuiltinRole {
    /// All built-in roles, in the order they are seeded in.
    pub const ALL: [BuiltinRole; 1] = [BuiltinRole::Administrator];

    /// Attempt to look up a [`BuiltinRole`] by its name (e.g. "admin").
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ADMINISTRATOR_ROLE_NAME => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Returns the name associated with the role.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinRole::Administrator => ADMINISTRATOR_ROLE_NAME,
        }
    }

    /// Returns the description the role is seeded with.
    #[rustfmt::skip]
    pub fn default_description(&self) -> &'static str {
        match self {
            BuiltinRole::Administrator =>
                "Administrator with full access to user and role management.",
        }
    }
}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin_role_names_round_trip() {
        for role in BuiltinRole::ALL {
            assert_eq!(BuiltinRole::from_name(role.name()), Some(role));
        }

        assert_eq!(
            BuiltinRole::Administrator.name(),
            ADMINISTRATOR_ROLE_NAME
        );
        assert_eq!(BuiltinRole::from_name("Admin"), None);
    }
}
