//! Argon2id password hashing.

use argon2::{Argon2, Version};
use serde::{Deserialize, Serialize};

use super::format::{invalid, parse_component, DerivedKey, KeyParams};
use super::{verify_tagged, Hasher};
use crate::error::{Error, Result};

/// Argon2id cost parameters
///
/// Serialized as `ARGON2ID$<time>$<memory>$<threads>$<keyLen>$<hex>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Params {
    /// Number of passes over memory (iterations)
    pub time: u32,
    /// Memory cost in KiB
    pub memory: u32,
    /// Degree of parallelism (lanes)
    pub threads: u8,
    /// Output length in bytes
    pub key_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time: 1,
            memory: 64 * 1024,
            threads: 4,
            key_len: 32,
        }
    }
}

impl Argon2Params {
    /// Check the parameters against the Argon2 domain (time ≥ 1,
    /// threads ≥ 1, memory ≥ 8 × threads, key length ≥ 4)
    pub fn validate(&self) -> std::result::Result<argon2::Params, argon2::Error> {
        argon2::Params::new(
            self.memory,
            self.time,
            u32::from(self.threads),
            Some(self.key_len as usize),
        )
    }

    /// Parse the four numeric components `time$memory$threads$keyLen`
    pub(super) fn parse(components: &[&str]) -> Result<Self> {
        let params = Self {
            time: parse_component(components[0], "time value")?,
            memory: parse_component(components[1], "memory value")?,
            threads: parse_component(components[2], "threads value")?,
            key_len: parse_component(components[3], "keyLen value")?,
        };

        params
            .validate()
            .map_err(|e| invalid(format!("invalid argon2 parameters, {}", e)))?;

        Ok(params)
    }

    /// Derive `key_len` bytes from plaintext and salt
    ///
    /// The salt must be at least 8 bytes long.
    pub fn derive(&self, plaintext: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        let params = self
            .validate()
            .map_err(|e| Error::KeyDerivationFailed(e.to_string()))?;
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let mut out = vec![0u8; self.key_len as usize];
        argon2
            .hash_password_into(plaintext, salt, &mut out)
            .map_err(|e| Error::KeyDerivationFailed(e.to_string()))?;

        Ok(out)
    }
}

/// [`Hasher`] using the Argon2id key derivation function
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Argon2Hasher {
    params: Argon2Params,
}

impl Argon2Hasher {
    /// Create an Argon2id hasher, rejecting parameters outside the Argon2 domain
    pub fn new(time: u32, memory: u32, threads: u8, key_len: u32) -> Result<Self> {
        Self::with_params(Argon2Params {
            time,
            memory,
            threads,
            key_len,
        })
    }

    /// Create an Argon2id hasher from a parameter set
    pub fn with_params(params: Argon2Params) -> Result<Self> {
        params
            .validate()
            .map_err(|e| Error::InvalidConfig(format!("argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// The parameters new hashes are minted with
    pub fn params(&self) -> &Argon2Params {
        &self.params
    }
}

impl Hasher for Argon2Hasher {
    fn hash(&self, plaintext: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        let key = DerivedKey::derive(KeyParams::Argon2id(self.params), plaintext, salt)?;
        Ok(key.to_string().into_bytes())
    }

    fn verify(&self, plaintext: &[u8], salt: &[u8], hashtext: &[u8]) -> Result<()> {
        verify_tagged(plaintext, salt, hashtext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAINTEXT: &str = "625181dbfb5c6100cdacd97f3ba32ab4";
    const SALT_HEX: &str = "478c1d403dec20707cf487f81c06d646";

    fn salt() -> Vec<u8> {
        hex::decode(SALT_HEX).unwrap()
    }

    #[test]
    fn test_default_hasher_known_vector() {
        let hasher = Argon2Hasher::default();

        let hash = hasher.hash(PLAINTEXT.as_bytes(), &salt()).unwrap();
        let hash = String::from_utf8(hash).unwrap();

        assert!(
            hash.starts_with("ARGON2ID$1$65536$4$32$fe8c4ec2"),
            "unexpected hash {}",
            hash
        );
        assert_eq!(hash.split('$').count(), 6);
    }

    #[test]
    fn test_hash_verify_round_trip() {
        let hasher = Argon2Hasher::new(1, 8 * 1024, 2, 32).unwrap();
        let hash = hasher.hash(b"correct horse", b"0123456789abcdef").unwrap();

        hasher
            .verify(b"correct horse", b"0123456789abcdef", &hash)
            .unwrap();
    }

    #[test]
    fn test_wrong_inputs_are_mismatches() {
        let hasher = Argon2Hasher::new(1, 8 * 1024, 2, 32).unwrap();
        let hash = hasher.hash(b"correct horse", b"0123456789abcdef").unwrap();

        assert!(matches!(
            hasher.verify(b"battery staple", b"0123456789abcdef", &hash),
            Err(Error::HashMismatch)
        ));
        assert!(matches!(
            hasher.verify(b"correct horse", b"fedcba9876543210", &hash),
            Err(Error::HashMismatch)
        ));
    }

    #[test]
    fn test_tampered_parameters_are_mismatches() {
        let hasher = Argon2Hasher::new(1, 8 * 1024, 2, 32).unwrap();
        let hash = String::from_utf8(hasher.hash(b"pw", b"0123456789abcdef").unwrap()).unwrap();

        let tampered = hash.replacen("ARGON2ID$1$", "ARGON2ID$2$", 1);
        assert!(matches!(
            hasher.verify(b"pw", b"0123456789abcdef", tampered.as_bytes()),
            Err(Error::HashMismatch)
        ));
    }

    #[test]
    fn test_embedded_parameters_drive_verification() {
        let legacy = Argon2Hasher::new(1, 8 * 1024, 1, 16).unwrap();
        let hash = legacy.hash(b"pw", b"0123456789abcdef").unwrap();

        // A hasher configured with today's defaults still verifies the legacy record.
        Argon2Hasher::default()
            .verify(b"pw", b"0123456789abcdef", &hash)
            .unwrap();
    }

    #[test]
    fn test_short_salt_fails_derivation() {
        let hasher = Argon2Hasher::new(1, 8 * 1024, 1, 32).unwrap();
        assert!(matches!(
            hasher.hash(b"pw", b"short"),
            Err(Error::KeyDerivationFailed(_))
        ));
    }

    #[test]
    fn test_new_rejects_out_of_domain_parameters() {
        assert!(matches!(Argon2Hasher::new(0, 65536, 4, 32), Err(Error::InvalidConfig(_))));
        assert!(matches!(Argon2Hasher::new(1, 65536, 0, 32), Err(Error::InvalidConfig(_))));
        assert!(matches!(Argon2Hasher::new(1, 65536, 4, 2), Err(Error::InvalidConfig(_))));
    }
}
