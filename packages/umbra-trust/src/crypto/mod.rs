//! # Cryptography Module
//!
//! Primitives behind every credential Umbra services store or hand out.
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CREDENTIAL CRYPTOGRAPHY                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 PASSWORD HASHING                                │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  password + salt (16 random bytes)                             │   │
//! │  │                          │                                      │   │
//! │  │                          ▼                                      │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │  │  Argon2id / scrypt  →  TAG$p1$p2$p3$keyLen$hex           │   │   │
//! │  │  │  HMAC-SHA256        →  32 raw bytes                       │   │   │
//! │  │  └─────────────────────────────────────────────────────────┘   │   │
//! │  │                                                                 │   │
//! │  │  Parameters travel with the hash; verification never consults │   │
//! │  │  the current defaults.                                         │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 AT-REST ENCRYPTION                              │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  AES-256-GCM                                                   │   │
//! │  │  • 256-bit key                                                 │   │
//! │  │  • 96-bit nonce (random per message)                           │   │
//! │  │  • 128-bit authentication tag                                  │   │
//! │  │                                                                 │   │
//! │  │  Output = nonce (12) ‖ ciphertext ‖ tag (16)                   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose | Notes |
//! |-----------|---------|-------|
//! | Argon2id | Password hashing | Memory-hard, RFC 9106 |
//! | scrypt | Password hashing | Default; memory-hard, RFC 7914 |
//! | HMAC-SHA256 | Derived secrets | Fast, no work factor |
//! | AES-256-GCM | Encryption | Hardware acceleration, AEAD |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: [`CipherKey`] is zeroized when dropped
//! 2. **Constant-Time Comparison**: hash verification never short-circuits
//! 3. **Secure Random**: `rand::rngs::OsRng` for salts, keys and nonces
//! 4. **No Nonce Reuse**: a fresh nonce for every encryption

mod cipher;
pub mod hasher;
mod random;

pub use cipher::{
    decrypt, encrypt, generate_aes_key, AesCipher, Cipher, CipherKey, KEY_SIZE, NONCE_SIZE,
    TAG_SIZE,
};
pub use hasher::{
    hmac_sha256, Algorithm, Argon2Hasher, Argon2Params, DerivedKey, Hasher, KeyParams,
    PasswordHasher, ScryptHasher, ScryptParams, Sha256Hasher,
};
pub use random::{fill_random, generate_salt, random_bytes, SALT_SIZE};
