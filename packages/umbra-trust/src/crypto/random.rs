//! # Randomness Source
//!
//! Thin wrapper over the operating system CSPRNG (`rand::rngs::OsRng`).
//!
//! Every salt, key and nonce in this crate comes from here. A failing
//! entropy source is surfaced as [`Error::RngFailed`]; there is no fallback
//! to a userspace generator.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

/// Size of generated password salts in bytes (128 bits)
pub const SALT_SIZE: usize = 16;

/// Fill `buf` with bytes from the OS CSPRNG.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(buf).map_err(|err| {
        tracing::error!(error = %err, "OS entropy source failed");
        Error::RngFailed
    })
}

/// Generate `n` cryptographically random bytes.
pub fn random_bytes(n: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; n];
    fill_random(&mut bytes)?;
    Ok(bytes)
}

/// Generate a fresh random salt for password hashing.
pub fn generate_salt() -> Result<Vec<u8>> {
    random_bytes(SALT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_bytes_are_unique() {
        let mut seen = HashSet::new();

        for _ in 0..1000 {
            let bytes = random_bytes(16).unwrap();
            assert_eq!(bytes.len(), 16);
            assert!(seen.insert(bytes), "random_bytes produced a duplicate");
        }
    }

    #[test]
    fn test_random_bytes_zero_length() {
        assert!(random_bytes(0).unwrap().is_empty());
    }

    #[test]
    fn test_generate_salt_length() {
        assert_eq!(generate_salt().unwrap().len(), SALT_SIZE);
    }
}
