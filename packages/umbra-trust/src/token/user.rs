//! Authenticated principal carried by a token.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role held by internal services
pub const SYSTEM_ROLE: &str = "SYSTEM";

/// Role held by administrators
pub const ADMIN_ROLE: &str = "ADMIN";

/// Role held by unauthenticated guests
pub const ANONYMOUS_ROLE: &str = "ANONYMOUS";

/// An identity plus its ordered roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity id; becomes the token subject
    pub id: String,
    /// Role names, in the order they were granted
    pub roles: Vec<String>,
}

impl User {
    /// Create a user from an id and any iterable of role names
    pub fn new<I, S>(id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive role membership
    pub fn has_role(&self, candidate: &str) -> bool {
        self.roles.iter().any(|role| role == candidate)
    }

    /// Holds [`SYSTEM_ROLE`]
    pub fn is_system(&self) -> bool {
        self.has_role(SYSTEM_ROLE)
    }

    /// Holds [`ADMIN_ROLE`]
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Holds [`ANONYMOUS_ROLE`]
    pub fn is_anonymous(&self) -> bool {
        self.has_role(ANONYMOUS_ROLE)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User(id={}, roles=[{}])", self.id, self.roles.join(" "))
    }
}
