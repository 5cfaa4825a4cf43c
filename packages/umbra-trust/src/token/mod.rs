//! # Bearer Tokens
//!
//! HS256-signed JWTs carrying an identity and its roles.
//!
//! ## Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         TOKEN LIFECYCLE                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ISSUE                                                                  │
//! │  ─────                                                                  │
//! │  User ──► id / roles present? ──no──► InvalidTokenContent              │
//! │                 │ yes                                                   │
//! │                 ▼                                                       │
//! │  claims { iss, sub, nbf = now-60s, iat = now, exp = now+lifetime,      │
//! │           role = "R1;R2" } ──► HS256 sign ──► header.payload.sig       │
//! │                                                                         │
//! │  VERIFY                                                                 │
//! │  ──────                                                                 │
//! │  token ──► decode + signature ───fail──► InvalidToken                  │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           iss == expected ───────no────► InvalidToken                  │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           now >= nbf ────────────no────► InvalidToken                  │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           now <= exp + leeway ───no────► ExpiredToken                  │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           sub non-empty ─────────no────► InvalidToken                  │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           User { id: sub, roles: role.split(';') }                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tokens are stateless: nothing tracks what was issued, and nothing can be
//! revoked before it expires.

mod claims;
mod issuer;
pub mod rbac;
mod user;
mod verifier;

pub use claims::{TokenClaims, NOT_BEFORE_SKEW_SECS, ROLE_DELIMITER};
pub use issuer::JwtIssuer;
pub use rbac::{extract_bearer, Authenticator, RoleGuard};
pub use user::{User, ADMIN_ROLE, ANONYMOUS_ROLE, SYSTEM_ROLE};
pub use verifier::{JwtVerifier, DEFAULT_LEEWAY_SECS};

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;

/// Mints signed tokens
pub trait Issuer: Send + Sync {
    /// Issue a token for `user` valid for `lifetime` from now
    ///
    /// A negative lifetime produces an already-expired token.
    fn issue(&self, user: &User, lifetime: chrono::Duration) -> Result<String>;
}

/// Checks tokens and recovers the user they carry
pub trait Verifier: Send + Sync {
    /// Verify `token` against the current time
    fn verify(&self, token: &str) -> Result<User>;
}

/// Issuer name and shared HMAC secret
///
/// Both sides of a token exchange must hold the same pair. The secret is
/// wiped on drop and never printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    /// Issuer name written into and expected in `iss`
    pub issuer: String,
    /// HS256 shared secret
    pub secret: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(issuer: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("issuer", &self.issuer)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
