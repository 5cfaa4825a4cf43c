//! Run slow hashers on tokio's blocking pool.
//!
//! Argon2id and scrypt burn tens to hundreds of milliseconds per call. Inside
//! an async service, call these wrappers instead of the [`Hasher`] methods so
//! request tasks are not starved.

use super::Hasher;
use crate::error::Result;

/// Hash on the blocking pool.
pub async fn hash<H>(hasher: H, plaintext: Vec<u8>, salt: Vec<u8>) -> Result<Vec<u8>>
where
    H: Hasher + 'static,
{
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext, &salt)).await?
}

/// Verify on the blocking pool.
pub async fn verify<H>(hasher: H, plaintext: Vec<u8>, salt: Vec<u8>, hashtext: Vec<u8>) -> Result<()>
where
    H: Hasher + 'static,
{
    tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &salt, &hashtext)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hasher::{PasswordHasher, ScryptHasher};
    use crate::error::Error;

    #[tokio::test]
    async fn test_offloaded_round_trip() {
        let hasher = PasswordHasher::Scrypt(ScryptHasher::new(1024, 8, 1, 32).unwrap());

        let record = hash(hasher.clone(), b"pw".to_vec(), b"salt".to_vec())
            .await
            .unwrap();
        verify(hasher.clone(), b"pw".to_vec(), b"salt".to_vec(), record.clone())
            .await
            .unwrap();

        let result = verify(hasher, b"nope".to_vec(), b"salt".to_vec(), record).await;
        assert!(matches!(result, Err(Error::HashMismatch)));
    }

    #[tokio::test]
    async fn test_offloaded_format_error() {
        let result = verify(
            ScryptHasher::default(),
            b"pw".to_vec(),
            b"salt".to_vec(),
            b"garbage".to_vec(),
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidHashFormat(_))));
    }
}
