//! Role model and related functionality
//!
//! Roles travel on the wire as plain strings. The backend's vocabulary is
//! open-ended, so a role either belongs to the known set or is carried as an
//! untrusted suggestion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The closed set of roles the console knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KnownRole {
    User,
    Admin,
    Manager,
    Editor,
    Guest,
    Support,
    Auditor,
}

impl KnownRole {
    /// Every known role, in display order
    pub const ALL: [KnownRole; 7] = [
        KnownRole::User,
        KnownRole::Admin,
        KnownRole::Manager,
        KnownRole::Editor,
        KnownRole::Guest,
        KnownRole::Support,
        KnownRole::Auditor,
    ];

    /// Get the role name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownRole::User => "ROLE_USER",
            KnownRole::Admin => "ROLE_ADMIN",
            KnownRole::Manager => "ROLE_MANAGER",
            KnownRole::Editor => "ROLE_EDITOR",
            KnownRole::Guest => "ROLE_GUEST",
            KnownRole::Support => "ROLE_SUPPORT",
            KnownRole::Auditor => "ROLE_AUDITOR",
        }
    }
}

impl FromStr for KnownRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or(())
    }
}

/// A role tag attached to a user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Member of the known vocabulary
    Known(KnownRole),
    /// Any other string, e.g. one produced by an external suggestion service
    Suggested(String),
}

impl Role {
    /// Parse a trimmed role name; never fails
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        match name.parse::<KnownRole>() {
            Ok(known) => Role::Known(known),
            Err(()) => Role::Suggested(name.to_string()),
        }
    }

    /// Split a comma-separated roles string, dropping empty entries
    pub fn parse_list(roles: &str) -> Vec<Role> {
        roles
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Role::parse)
            .collect()
    }

    /// Whether the role comes from the known vocabulary
    pub fn is_trusted(&self) -> bool {
        matches!(self, Role::Known(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Known(known) => known.as_str(),
            Role::Suggested(name) => name,
        }
    }
}

impl From<KnownRole> for Role {
    fn from(role: KnownRole) -> Self {
        Role::Known(role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Role::parse(&name))
    }
}

/// Join roles into the comma-separated form the backend stores
pub fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Serde adapter: roles travel comma-joined, and are accepted either joined or as a list
pub mod wire {
    use super::{Role, join_roles};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RolesRepr {
        Joined(String),
        List(Vec<Role>),
    }

    impl From<RolesRepr> for Vec<Role> {
        fn from(repr: RolesRepr) -> Self {
            match repr {
                RolesRepr::Joined(joined) => Role::parse_list(&joined),
                RolesRepr::List(list) => list
                    .into_iter()
                    .filter(|role| !role.as_str().is_empty())
                    .collect(),
            }
        }
    }

    pub fn serialize<S: Serializer>(roles: &[Role], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&join_roles(roles))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Role>, D::Error> {
        Ok(RolesRepr::deserialize(deserializer)?.into())
    }

    pub mod option {
        use super::{Role, RolesRepr, join_roles};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            roles: &Option<Vec<Role>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match roles {
                Some(roles) => serializer.serialize_str(&join_roles(roles)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Vec<Role>>, D::Error> {
            Ok(Option::<RolesRepr>::deserialize(deserializer)?.map(Into::into))
        }
    }
}
