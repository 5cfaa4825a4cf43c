//! HMAC-SHA256 derived secrets.
//!
//! Meant for fixed-length derived values such as lookup keys, not for
//! login passwords: there is no work factor and no textual envelope.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::{constant_time_eq, Hasher};
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256(message: &[u8], key: &[u8]) -> Result<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::KeyDerivationFailed(format!("failed to compute hmac: {}", e)))?;
    mac.update(message);

    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// [`Hasher`] computing `SHA-256(HMAC-SHA256(key = salt, message = plaintext))`
///
/// Returns the raw 32 digest bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(&self, plaintext: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        let mac = hmac_sha256(plaintext, salt)?;
        Ok(Sha256::digest(mac).to_vec())
    }

    fn verify(&self, plaintext: &[u8], salt: &[u8], hashtext: &[u8]) -> Result<()> {
        let hash = self.hash(plaintext, salt)?;
        if constant_time_eq(&hash, hashtext) {
            Ok(())
        } else {
            Err(Error::HashMismatch)
        }
    }
}
