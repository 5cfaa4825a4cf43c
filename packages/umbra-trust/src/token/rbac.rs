//! # Role-Based Access Control
//!
//! The transport-free core of request authorization:
//!
//! ```text
//! "Authorization: Bearer <jwt>"
//!          │ extract_bearer        empty ──► MissingCredentials
//!          ▼
//!        <jwt>
//!          │ Verifier::verify      any failure propagates unchanged
//!          ▼
//!        User
//!          │ RoleGuard::authorize  no allowed role ──► Forbidden
//!          ▼
//!        User (authorized)
//! ```
//!
//! Role matching is exact and case-sensitive. There is no hierarchy and no
//! wildcard: `ADMIN` does not imply anything else.

use std::sync::Arc;

use super::{Credentials, JwtVerifier, User, Verifier, DEFAULT_LEEWAY_SECS};
use crate::error::{Error, Result};
use crate::events::{default_sink, SharedSink, TrustEvent};

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of an `Authorization` header value
///
/// A value without the `Bearer ` prefix is taken as the token itself.
pub fn extract_bearer(header: &str) -> Result<&str> {
    let token = header.strip_prefix(BEARER_PREFIX).unwrap_or(header);
    if token.is_empty() {
        return Err(Error::MissingCredentials);
    }
    Ok(token)
}

/// Allow-list of role names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGuard {
    allowed: Vec<String>,
}

impl RoleGuard {
    /// Build a guard; empty role names are dropped
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = roles
            .into_iter()
            .map(Into::into)
            .filter(|role: &String| !role.is_empty())
            .collect();
        Self { allowed }
    }

    /// The roles this guard admits
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Pass if the user holds any allowed role
    ///
    /// A guard with no roles admits nobody.
    pub fn authorize(&self, user: &User) -> Result<()> {
        if self.allowed.iter().any(|role| user.has_role(role)) {
            Ok(())
        } else {
            Err(Error::Forbidden(format!("access denied for {}", user)))
        }
    }
}

/// Header-to-user pipeline: bearer extraction, verification, role check
#[derive(Clone)]
pub struct Authenticator {
    verifier: Arc<dyn Verifier>,
    guard: RoleGuard,
    sink: SharedSink,
}

impl Authenticator {
    /// Combine a verifier with a role guard
    pub fn new(verifier: Arc<dyn Verifier>, guard: RoleGuard) -> Self {
        Self {
            verifier,
            guard,
            sink: default_sink(),
        }
    }

    /// Authenticator over a [`JwtVerifier`] with the default one-minute leeway
    pub fn from_credentials(credentials: &Credentials, guard: RoleGuard) -> Self {
        let leeway = chrono::Duration::seconds(DEFAULT_LEEWAY_SECS);
        Self::new(Arc::new(JwtVerifier::new(credentials, leeway)), guard)
    }

    /// Replace the event sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// The role guard applied after verification
    pub fn guard(&self) -> &RoleGuard {
        &self.guard
    }

    /// Authenticate and authorize an `Authorization` header value
    pub fn authenticate(&self, header: &str) -> Result<User> {
        let token = extract_bearer(header).map_err(|err| {
            self.sink.record(&TrustEvent::CredentialsMissing);
            err
        })?;

        let user = self.verifier.verify(token)?;

        match self.guard.authorize(&user) {
            Ok(()) => {
                self.sink.record(&TrustEvent::AccessGranted {
                    subject: user.id.clone(),
                });
                Ok(user)
            }
            Err(err) => {
                self.sink.record(&TrustEvent::AccessDenied {
                    subject: user.id.clone(),
                });
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CountingSink, NoopSink};
    use crate::token::{Issuer, JwtIssuer, ADMIN_ROLE, ANONYMOUS_ROLE};

    fn credentials() -> Credentials {
        Credentials::new("rbac-test", "rbac-secret")
    }

    fn header_for(role: &str) -> String {
        if role.is_empty() {
            return String::new();
        }
        let token = JwtIssuer::new(&credentials())
            .with_sink(Arc::new(NoopSink))
            .issue(&User::new("user-1", [role]), chrono::Duration::hours(1))
            .unwrap();
        format!("Bearer {}", token)
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert_eq!(extract_bearer("abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(matches!(extract_bearer(""), Err(Error::MissingCredentials)));
        assert!(matches!(extract_bearer("Bearer "), Err(Error::MissingCredentials)));
    }

    #[test]
    fn test_guard_drops_empty_roles() {
        let guard = RoleGuard::new(["", ADMIN_ROLE, ""]);
        assert_eq!(guard.allowed(), [ADMIN_ROLE.to_string()]);

        let empty = RoleGuard::new(Vec::<String>::new());
        assert!(matches!(
            empty.authorize(&User::new("u", [""])),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn test_guard_is_case_sensitive() {
        let guard = RoleGuard::new([ADMIN_ROLE]);
        assert!(guard.authorize(&User::new("u", ["ADMIN"])).is_ok());
        assert!(guard.authorize(&User::new("u", ["admin"])).is_err());
    }

    #[test]
    fn test_forbidden_message_names_user() {
        let guard = RoleGuard::new([ADMIN_ROLE]);
        let err = guard.authorize(&User::new("u-7", ["USER"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Access denied: access denied for User(id=u-7, roles=[USER])"
        );
    }

    #[test]
    fn test_authenticator() {
        let sink = Arc::new(CountingSink::new());
        let auth = Authenticator::from_credentials(
            &credentials(),
            RoleGuard::new([ANONYMOUS_ROLE, ADMIN_ROLE]),
        )
        .with_sink(sink.clone());

        assert_eq!(auth.authenticate(&header_for(ANONYMOUS_ROLE)).unwrap().id, "user-1");
        assert!(auth.authenticate(&header_for(ADMIN_ROLE)).is_ok());
        assert!(matches!(
            auth.authenticate(&header_for("")),
            Err(Error::MissingCredentials)
        ));
        assert!(matches!(
            auth.authenticate(&header_for("OTHER_ROLE")),
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            auth.authenticate("Bearer not-a-token"),
            Err(Error::InvalidToken)
        ));

        assert_eq!(sink.count("access_granted"), 2);
        assert_eq!(sink.count("access_denied"), 1);
        assert_eq!(sink.count("credentials_missing"), 1);
    }
}
