//! # Self-Describing Hash Format
//!
//! ```text
//! SCRYPT$<N>$<r>$<p>$<keyLen>$<hex(hash)>
//! ARGON2ID$<time>$<memory>$<threads>$<keyLen>$<hex(hash)>
//! ```
//!
//! Exactly six `$`-separated components. The leading tag selects the
//! parameter parser and, on verification, the key derivation function.
//! These strings are persisted, so the layout is frozen.

use std::fmt;
use std::str::FromStr;

use super::argon2id::Argon2Params;
use super::scrypt_kdf::ScryptParams;
use crate::error::{Error, Result};

const COMPONENT_SEPARATOR: char = '$';
const COMPONENT_COUNT: usize = 6;

/// Tagged key derivation algorithms
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Argon2id (RFC 9106)
    Argon2id,
    /// scrypt (RFC 7914)
    Scrypt,
}

impl Algorithm {
    /// Textual tag written at the front of a serialized hash
    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::Argon2id => "ARGON2ID",
            Algorithm::Scrypt => "SCRYPT",
        }
    }

    /// Look up an algorithm by its tag (case-sensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ARGON2ID" => Some(Algorithm::Argon2id),
            "SCRYPT" => Some(Algorithm::Scrypt),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Algorithm identity plus its numeric parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyParams {
    /// Argon2id parameters
    Argon2id(Argon2Params),
    /// scrypt parameters
    Scrypt(ScryptParams),
}

impl KeyParams {
    /// The algorithm these parameters belong to
    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeyParams::Argon2id(_) => Algorithm::Argon2id,
            KeyParams::Scrypt(_) => Algorithm::Scrypt,
        }
    }

    /// Declared output length in bytes
    pub fn key_len(&self) -> usize {
        match self {
            KeyParams::Argon2id(params) => params.key_len as usize,
            KeyParams::Scrypt(params) => params.key_len,
        }
    }

    /// Run the key derivation function described by these parameters
    pub fn derive(&self, plaintext: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        match self {
            KeyParams::Argon2id(params) => params.derive(plaintext, salt),
            KeyParams::Scrypt(params) => params.derive(plaintext, salt),
        }
    }
}

/// The persisted representation of a password hash
///
/// Created by hashing, consumed by verification, never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey {
    /// Algorithm and parameters the hash was derived with
    pub params: KeyParams,
    /// Raw derived bytes; always `params.key_len()` long
    pub hash: Vec<u8>,
}

impl DerivedKey {
    /// Derive a fresh key with the given parameters
    pub fn derive(params: KeyParams, plaintext: &[u8], salt: &[u8]) -> Result<Self> {
        let hash = params.derive(plaintext, salt)?;
        Ok(Self { params, hash })
    }

    /// Parse a serialized hash record
    ///
    /// Every failure here is [`Error::InvalidHashFormat`].
    pub fn parse(hashtext: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(hashtext)
            .map_err(|_| invalid("hash record is not valid UTF-8"))?;

        let components: Vec<&str> = text.split(COMPONENT_SEPARATOR).collect();
        if components.len() != COMPONENT_COUNT {
            return Err(invalid("unexpected number of components"));
        }

        let algorithm = Algorithm::from_tag(components[0])
            .ok_or_else(|| invalid(format!("unsupported algorithm tag {:?}", components[0])))?;

        let params = match algorithm {
            Algorithm::Argon2id => KeyParams::Argon2id(Argon2Params::parse(&components[1..5])?),
            Algorithm::Scrypt => KeyParams::Scrypt(ScryptParams::parse(&components[1..5])?),
        };

        let hash = hex::decode(components[5])?;
        if hash.len() != params.key_len() {
            return Err(invalid("invalid hash, does not match key length"));
        }

        Ok(Self { params, hash })
    }

    /// Whether this record was minted with parameters other than `current`
    ///
    /// The core never rehashes on its own; callers can use this after a
    /// successful verification to upgrade stored credentials.
    pub fn needs_rehash(&self, current: &KeyParams) -> bool {
        self.params != *current
    }
}

impl FromStr for DerivedKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.as_bytes())
    }
}

impl fmt::Display for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hash = hex::encode(&self.hash);
        match &self.params {
            KeyParams::Argon2id(p) => write!(
                f,
                "{}${}${}${}${}${}",
                Algorithm::Argon2id,
                p.time,
                p.memory,
                p.threads,
                p.key_len,
                hash
            ),
            KeyParams::Scrypt(p) => write!(
                f,
                "{}${}${}${}${}${}",
                Algorithm::Scrypt,
                p.n,
                p.r,
                p.p,
                p.key_len,
                hash
            ),
        }
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("params", &self.params)
            .field("hash_len", &self.hash.len())
            .finish()
    }
}

/// Parse one numeric component, naming it in the error.
pub(super) fn parse_component<T: FromStr>(value: &str, name: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| invalid(format!("invalid {}, {}", name, e)))
}

pub(super) fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidHashFormat(reason.into())
}

// ============================================================================
// TESTS
// ============================================================================
