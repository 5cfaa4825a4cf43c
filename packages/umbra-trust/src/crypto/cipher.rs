//! # Symmetric Cipher
//!
//! AES-256-GCM for at-rest protection of secrets.
//!
//! ## Ciphertext Layout
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┬───────────────────────┐
//! │  nonce (12 B)    │  ciphertext (len(pt) B)  │  auth tag (16 B)      │
//! └──────────────────┴──────────────────────────┴───────────────────────┘
//! ```
//!
//! No length prefix and no associated data. The nonce is drawn fresh from
//! the OS CSPRNG for every call to [`encrypt`], so the same plaintext never
//! encrypts to the same buffer twice under one key.
//!
//! Decryption never returns partial plaintext: every authentication failure
//! (wrong key, flipped bit, truncated tag) collapses into the opaque
//! [`Error::DecryptionFailed`].
//!
//! Keys are owned by the caller. This module neither stores nor rotates them.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce as AesNonce,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::random::fill_random;
use crate::error::{Error, Result};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the encryption key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// An AES-256-GCM key
///
/// Zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey([u8; KEY_SIZE]);

impl CipherKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, which must be exactly [`KEY_SIZE`] bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            Error::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    /// Generate a new random key from the OS CSPRNG
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; KEY_SIZE];
        fill_random(&mut key)?;
        Ok(Self(key))
    }

    /// Get the raw key bytes
    ///
    /// Only for handing the key to the caller's own key store.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey(..)")
    }
}

/// Generate a random AES-256 key.
pub fn generate_aes_key() -> Result<CipherKey> {
    CipherKey::generate()
}

/// Encrypt `plaintext` with AES-256-GCM.
///
/// Returns `nonce || ciphertext || tag`.
pub fn encrypt(key: &CipherKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| Error::EncryptionFailed(format!("Invalid key: {}", e)))?;

    let mut nonce = [0u8; NONCE_SIZE];
    fill_random(&mut nonce)?;

    let sealed = cipher
        .encrypt(AesNonce::from_slice(&nonce), plaintext)
        .map_err(|e| Error::EncryptionFailed(format!("Encryption failed: {}", e)))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Decrypt a buffer produced by [`encrypt`].
///
/// ## Errors
///
/// - [`Error::CiphertextTooShort`] if the buffer cannot even hold a nonce
/// - [`Error::DecryptionFailed`] for every authentication failure
pub fn decrypt(key: &CipherKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < NONCE_SIZE {
        return Err(Error::CiphertextTooShort);
    }

    let cipher = Aes256Gcm::new_from_slice(&key.0).map_err(|_| Error::DecryptionFailed)?;
    let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);

    cipher
        .decrypt(AesNonce::from_slice(nonce), sealed)
        .map_err(|_| Error::DecryptionFailed)
}

/// Symmetric cipher bound to a key
pub trait Cipher: Send + Sync {
    /// Encrypt plaintext with the cipher's key
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt ciphertext with the cipher's key
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// [`Cipher`] implementation using AES-256-GCM
#[derive(Clone, Debug)]
pub struct AesCipher {
    key: CipherKey,
}

impl AesCipher {
    /// Create a cipher over the given key
    pub fn new(key: CipherKey) -> Self {
        Self { key }
    }

    /// Create a cipher from raw key bytes (must be 32 bytes)
    pub fn from_slice(key: &[u8]) -> Result<Self> {
        Ok(Self::new(CipherKey::from_slice(key)?))
    }
}

impl Cipher for AesCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encrypt(&self.key, plaintext)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        decrypt(&self.key, ciphertext)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_basic() {
        let key = CipherKey::from_bytes([42u8; 32]);
        let plaintext = b"my secret data";

        let ciphertext = encrypt(&key, plaintext).unwrap();
        assert_ne!(&ciphertext[NONCE_SIZE..], plaintext);

        let decrypted = decrypt(&key, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_encrypt_decrypt_empty() {
        let key = CipherKey::generate().unwrap();

        let ciphertext = encrypt(&key, b"").unwrap();
        assert_eq!(ciphertext.len(), NONCE_SIZE + TAG_SIZE);
        assert!(decrypt(&key, &ciphertext).unwrap().is_empty());
    }

    #[test]
    fn test_ciphertext_layout() {
        let key = CipherKey::generate().unwrap();
        let plaintext = b"layout check";

        let ciphertext = encrypt(&key, plaintext).unwrap();
        assert_eq!(ciphertext.len(), NONCE_SIZE + plaintext.len() + TAG_SIZE);
    }

    #[test]
    fn test_different_nonces_produce_different_ciphertext() {
        let key = CipherKey::from_bytes([42u8; 32]);

        let ct1 = encrypt(&key, b"Hello, World!").unwrap();
        let ct2 = encrypt(&key, b"Hello, World!").unwrap();

        assert_ne!(ct1, ct2);
        assert_ne!(ct1[..NONCE_SIZE], ct2[..NONCE_SIZE]);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = CipherKey::from_bytes([42u8; 32]);
        let mut ciphertext = encrypt(&key, b"Hello, World!").unwrap();

        ciphertext[NONCE_SIZE] ^= 0xFF;

        assert!(matches!(decrypt(&key, &ciphertext), Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let key = CipherKey::from_bytes([42u8; 32]);
        let mut ciphertext = encrypt(&key, b"Hello, World!").unwrap();

        ciphertext[0] ^= 0x01;

        assert!(matches!(decrypt(&key, &ciphertext), Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_truncated_tag_fails() {
        let key = CipherKey::from_bytes([42u8; 32]);
        let ciphertext = encrypt(&key, b"Hello, World!").unwrap();

        let truncated = &ciphertext[..ciphertext.len() - 1];
        assert!(matches!(decrypt(&key, truncated), Err(Error::DecryptionFailed)));

        // Exactly a nonce and nothing else: long enough to split, too short to open.
        assert!(matches!(
            decrypt(&key, &ciphertext[..NONCE_SIZE]),
            Err(Error::DecryptionFailed)
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = CipherKey::from_bytes([42u8; 32]);
        let key2 = CipherKey::from_bytes([99u8; 32]);

        let ciphertext = encrypt(&key1, b"secret").unwrap();
        assert!(matches!(decrypt(&key2, &ciphertext), Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_too_short_ciphertext() {
        let key = CipherKey::from_bytes([42u8; 32]);

        assert!(matches!(decrypt(&key, &[]), Err(Error::CiphertextTooShort)));
        assert!(matches!(
            decrypt(&key, &[0u8; NONCE_SIZE - 1]),
            Err(Error::CiphertextTooShort)
        ));
    }

    #[test]
    fn test_key_from_slice_rejects_wrong_length() {
        assert!(CipherKey::from_slice(&[0u8; 32]).is_ok());
        assert!(matches!(
            CipherKey::from_slice(b"some-secret-key-"),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(CipherKey::from_slice(&[0u8; 33]), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_aes_cipher_trait_round_trip() {
        let key = generate_aes_key().unwrap();
        let cipher: Box<dyn Cipher> = Box::new(AesCipher::new(key));

        let ciphertext = cipher.encrypt(b"my secret data").unwrap();
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"my secret data");
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let key = CipherKey::from_bytes([7u8; 32]);
        assert_eq!(format!("{:?}", key), "CipherKey(..)");
    }
}
