//! # Umbra Trust
//!
//! Credential and trust primitives for Umbra services: password hashing,
//! bearer tokens and at-rest encryption.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         UMBRA TRUST MODULES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │  Hashing Engine  │  │  Token Issuer /  │  │  Symmetric       │      │
//! │  │                  │  │  Verifier        │  │  Cipher          │      │
//! │  │ - Argon2id       │  │ - HS256 JWT      │  │ - AES-256-GCM    │      │
//! │  │ - scrypt         │  │ - nbf / exp      │  │ - nonce ‖ ct     │      │
//! │  │ - HMAC-SHA256    │  │ - RoleGuard      │  │                  │      │
//! │  └────────┬─────────┘  └────────┬─────────┘  └────────┬─────────┘      │
//! │           │                     │                     │                │
//! │           └─────────────────────┼─────────────────────┘                │
//! │                                 ▼                                      │
//! │                    ┌──────────────────────────┐                        │
//! │                    │  Randomness Source       │                        │
//! │                    │  (OS CSPRNG)             │                        │
//! │                    └──────────────────────────┘                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error type shared by every component
//! - [`crypto`] - Hashers, cipher and randomness
//! - [`token`] - JWT issue/verify and role-based access control
//! - [`events`] - Injected event sinks
//! - [`config`] - Configuration from JSON or the environment
//!
//! ## Request Flow
//!
//! ```text
//! sign-up:  password ──► generate_salt ──► Hasher::hash ──► store (salt, hash)
//! login:    password ──► Hasher::verify(stored) ──► Issuer::issue ──► token
//! request:  "Bearer <token>" ──► Authenticator ──► User
//! ```
//!
//! Every component is an ordinary value. There is no global instance:
//! build a [`TrustContext`] once and share it.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod config;
pub mod crypto;
pub mod error;
pub mod events;
/// Unix-second clock helpers.
pub mod time;
pub mod token;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::{HasherConfig, TrustConfig};
pub use crypto::{Hasher, PasswordHasher};
pub use error::{Error, Result};
pub use events::{EventSink, TrustEvent};
pub use token::{Authenticator, Credentials, Issuer, JwtIssuer, JwtVerifier, RoleGuard, User, Verifier};

// ============================================================================
// TRUST CONTEXT
// ============================================================================

use std::sync::Arc;

use events::SharedSink;

/// A configured hasher, issuer and verifier sharing one event sink
///
/// ## Example
///
/// ```
/// use umbra_trust::{Credentials, Hasher, Issuer, TrustConfig, TrustContext, Verifier, User};
///
/// let config = TrustConfig::new(Credentials::new("accounts", "change-me"));
/// let trust = TrustContext::new(&config)?;
///
/// let token = trust.issue(&User::new("user-1", ["USER"]))?;
/// let user = trust.verifier().verify(&token)?;
/// assert_eq!(user.id, "user-1");
/// # Ok::<(), umbra_trust::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TrustContext {
    hasher: PasswordHasher,
    issuer: JwtIssuer,
    verifier: JwtVerifier,
    token_lifetime: chrono::Duration,
}

impl TrustContext {
    /// Build every component from configuration, logging through `tracing`
    pub fn new(config: &TrustConfig) -> Result<Self> {
        Self::with_sink(config, events::default_sink())
    }

    /// Build every component from configuration with a custom event sink
    pub fn with_sink(config: &TrustConfig, sink: SharedSink) -> Result<Self> {
        config.validate()?;

        let hasher = PasswordHasher::from_config(&config.hasher)?;
        let issuer = JwtIssuer::new(&config.credentials).with_sink(Arc::clone(&sink));
        let verifier = JwtVerifier::new(&config.credentials, config.leeway()).with_sink(sink);

        tracing::info!(
            issuer = %config.credentials.issuer,
            hasher = hasher.algorithm_name(),
            leeway_secs = config.leeway_secs,
            "Trust context initialized"
        );

        Ok(Self {
            hasher,
            issuer,
            verifier,
            token_lifetime: config.token_lifetime(),
        })
    }

    /// Password hasher for new credentials
    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Token issuer
    pub fn issuer(&self) -> &JwtIssuer {
        &self.issuer
    }

    /// Token verifier
    pub fn verifier(&self) -> &JwtVerifier {
        &self.verifier
    }

    /// Issue a token with the configured lifetime
    pub fn issue(&self, user: &User) -> Result<String> {
        self.issuer.issue(user, self.token_lifetime)
    }

    /// Authenticator admitting `roles`, sharing this context's verifier
    pub fn authenticator<I, S>(&self, roles: I) -> Authenticator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Authenticator::new(Arc::new(self.verifier.clone()), RoleGuard::new(roles))
    }
}

// ============================================================================
// VERSION INFO
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CountingSink;

    fn config() -> TrustConfig {
        let mut config = TrustConfig::new(Credentials::new("accounts", "change-me"));
        config.hasher = HasherConfig::Scrypt(crypto::ScryptParams {
            n: 1024,
            ..Default::default()
        });
        config
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_context_end_to_end() {
        let sink = Arc::new(CountingSink::new());
        let trust = TrustContext::with_sink(&config(), sink.clone()).unwrap();

        let salt = crypto::generate_salt().unwrap();
        let stored = trust.hasher().hash(b"hunter2", &salt).unwrap();
        trust.hasher().verify(b"hunter2", &salt, &stored).unwrap();

        let token = trust.issue(&User::new("user-1", ["ADMIN"])).unwrap();
        let auth = trust.authenticator(["ADMIN"]).with_sink(sink.clone());
        let user = auth.authenticate(&format!("Bearer {}", token)).unwrap();

        assert!(user.is_admin());
        assert_eq!(sink.count("token_issued"), 1);
        assert_eq!(sink.count("token_verified"), 1);
        assert_eq!(sink.count("access_granted"), 1);
    }

    #[test]
    fn test_context_rejects_invalid_config() {
        let config = TrustConfig::new(Credentials::new("accounts", ""));
        assert!(matches!(TrustContext::new(&config), Err(Error::InvalidConfig(_))));

        let mut config = self::config();
        config.hasher = HasherConfig::Scrypt(crypto::ScryptParams {
            n: 3,
            ..Default::default()
        });
        assert!(matches!(TrustContext::new(&config), Err(Error::InvalidConfig(_))));
    }
}
