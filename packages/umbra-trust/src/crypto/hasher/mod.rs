//! # Password Hashing Engine
//!
//! A closed family of key derivation functions behind one contract.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         HASHER FAMILY                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   Hasher::hash(plaintext, salt)              Hasher::verify(..., rec)   │
//! │   ─────────────────────────────              ────────────────────────   │
//! │   current parameters                         parse rec                  │
//! │          │                                       │                      │
//! │          ▼                                       ▼                      │
//! │   ┌──────────────┐                         TAG selects KDF              │
//! │   │ Argon2id     │──► ARGON2ID$t$m$p$len$hex     │                      │
//! │   │ scrypt       │──► SCRYPT$N$r$p$len$hex       ▼                      │
//! │   │ HMAC-SHA256  │──► raw 32 bytes         re-derive with EMBEDDED      │
//! │   └──────────────┘                         parameters, compare in       │
//! │                                            constant time                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Verification always uses the parameters stored in the record, never the
//! hasher's current defaults, so credentials minted under older (or other)
//! parameter sets keep verifying after the defaults move on.
//!
//! | Outcome | Error |
//! |---------|-------|
//! | Record does not parse / out-of-domain parameters | [`Error::InvalidHashFormat`] |
//! | Wrong plaintext, wrong salt, tampered parameters | [`Error::HashMismatch`] |
//!
//! Argon2id and scrypt are deliberately slow. Use [`offload`] to keep them
//! off latency-sensitive tasks.

mod argon2id;
mod format;
mod hmac_sha256;
pub mod offload;
mod scrypt_kdf;

pub use argon2id::{Argon2Hasher, Argon2Params};
pub use format::{Algorithm, DerivedKey, KeyParams};
pub use hmac_sha256::{hmac_sha256, Sha256Hasher};
pub use scrypt_kdf::{ScryptHasher, ScryptParams};

use crate::config::HasherConfig;
use crate::error::{Error, Result};

/// Capability contract shared by every hashing algorithm
pub trait Hasher: Send + Sync {
    /// Derive a hash of `plaintext` under `salt` with the current parameters
    fn hash(&self, plaintext: &[u8], salt: &[u8]) -> Result<Vec<u8>>;

    /// Check that `plaintext` and `salt` produce `hashtext`
    fn verify(&self, plaintext: &[u8], salt: &[u8], hashtext: &[u8]) -> Result<()>;
}

/// The closed set of hasher implementations
///
/// Built from [`HasherConfig`]; dispatches by variant rather than through a
/// trait object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PasswordHasher {
    /// Argon2id, tag `ARGON2ID`
    Argon2id(Argon2Hasher),
    /// scrypt, tag `SCRYPT`
    Scrypt(ScryptHasher),
    /// HMAC-SHA256, untagged raw bytes
    HmacSha256(Sha256Hasher),
}

impl PasswordHasher {
    /// Build the hasher described by the configuration
    pub fn from_config(config: &HasherConfig) -> Result<Self> {
        Ok(match config {
            HasherConfig::Argon2id(params) => {
                PasswordHasher::Argon2id(Argon2Hasher::with_params(*params)?)
            }
            HasherConfig::Scrypt(params) => {
                PasswordHasher::Scrypt(ScryptHasher::with_params(*params)?)
            }
            HasherConfig::HmacSha256 => PasswordHasher::HmacSha256(Sha256Hasher),
        })
    }

    /// Human-readable algorithm name, for logs
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            PasswordHasher::Argon2id(_) => Algorithm::Argon2id.tag(),
            PasswordHasher::Scrypt(_) => Algorithm::Scrypt.tag(),
            PasswordHasher::HmacSha256(_) => "HMAC-SHA256",
        }
    }

    /// Parameters new hashes are minted with; `None` for the untagged variant
    pub fn current_params(&self) -> Option<KeyParams> {
        match self {
            PasswordHasher::Argon2id(h) => Some(KeyParams::Argon2id(*h.params())),
            PasswordHasher::Scrypt(h) => Some(KeyParams::Scrypt(*h.params())),
            PasswordHasher::HmacSha256(_) => None,
        }
    }

    /// Whether a stored record should be re-hashed with the current parameters
    ///
    /// Call after a successful [`Hasher::verify`]. Always `false` for the
    /// untagged HMAC-SHA256 variant.
    pub fn needs_rehash(&self, hashtext: &[u8]) -> Result<bool> {
        match self.current_params() {
            Some(current) => Ok(DerivedKey::parse(hashtext)?.needs_rehash(&current)),
            None => Ok(false),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        PasswordHasher::Scrypt(ScryptHasher::default())
    }
}

impl Hasher for PasswordHasher {
    fn hash(&self, plaintext: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        match self {
            PasswordHasher::Argon2id(h) => h.hash(plaintext, salt),
            PasswordHasher::Scrypt(h) => h.hash(plaintext, salt),
            PasswordHasher::HmacSha256(h) => h.hash(plaintext, salt),
        }
    }

    fn verify(&self, plaintext: &[u8], salt: &[u8], hashtext: &[u8]) -> Result<()> {
        match self {
            PasswordHasher::Argon2id(h) => h.verify(plaintext, salt, hashtext),
            PasswordHasher::Scrypt(h) => h.verify(plaintext, salt, hashtext),
            PasswordHasher::HmacSha256(h) => h.verify(plaintext, salt, hashtext),
        }
    }
}

/// Verify against a tagged record using the record's own algorithm and
/// parameters.
pub(crate) fn verify_tagged(plaintext: &[u8], salt: &[u8], hashtext: &[u8]) -> Result<()> {
    let stored = DerivedKey::parse(hashtext).map_err(|err| {
        tracing::warn!(error = %err, "Stored hash record failed validation");
        err
    })?;

    let derived = stored.params.derive(plaintext, salt)?;
    if constant_time_eq(&derived, &stored.hash) {
        Ok(())
    } else {
        tracing::debug!(algorithm = %stored.params.algorithm(), "Hash mismatch");
        Err(Error::HashMismatch)
    }
}

/// Constant-time byte comparison to prevent timing attacks.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ============================================================================
// TESTS
// ============================================================================
