//! JWT claim set.

use serde::{Deserialize, Serialize};

use super::User;

/// Separator between role names in the `role` claim. Not escaped.
pub const ROLE_DELIMITER: &str = ";";

/// How far `nbf` is back-dated at issuance, in seconds
pub const NOT_BEFORE_SKEW_SECS: i64 = 60;

/// Registered claims plus the compact `role` claim
///
/// Timestamps are NumericDate seconds. Every field is optional on the wire
/// so a decoded token with missing claims reaches the verifier's own
/// checks instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer name
    #[serde(default)]
    pub iss: String,
    /// Subject (user id)
    #[serde(default)]
    pub sub: String,
    /// Not before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Roles joined with [`ROLE_DELIMITER`]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
}

impl TokenClaims {
    /// Claims for `user`, issued at `now` and expiring at `expires_at`
    pub fn for_user(issuer: &str, user: &User, now: i64, expires_at: i64) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: user.id.clone(),
            nbf: Some(now.saturating_sub(NOT_BEFORE_SKEW_SECS)),
            iat: Some(now),
            exp: Some(expires_at),
            role: user.roles.join(ROLE_DELIMITER),
        }
    }

    /// Rebuild the user the claims describe
    ///
    /// An absent or empty `role` claim yields a single empty role name.
    pub fn to_user(&self) -> User {
        User {
            id: self.sub.clone(),
            roles: self.role.split(ROLE_DELIMITER).map(String::from).collect(),
        }
    }
}
