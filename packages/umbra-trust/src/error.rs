//! # Error Handling
//!
//! This module provides the error type shared by every Umbra Trust component.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Hashing Errors                                                    │
//! │  │   ├── InvalidHashFormat     - Stored record malformed / tampered    │
//! │  │   ├── HashMismatch          - Wrong secret OR tampered parameters   │
//! │  │   └── KeyDerivationFailed   - KDF rejected its inputs               │
//! │  │                                                                      │
//! │  ├── Token Errors                                                      │
//! │  │   ├── InvalidTokenContent   - Nothing to mint (no id / no roles)    │
//! │  │   ├── InvalidToken          - Signature, issuer, nbf, subject       │
//! │  │   ├── ExpiredToken          - Past expiry + leeway                  │
//! │  │   ├── SigningFailed         - Encoder failure                       │
//! │  │   ├── MissingCredentials    - No bearer token supplied              │
//! │  │   └── Forbidden             - Authenticated, but no allowed role    │
//! │  │                                                                      │
//! │  ├── Crypto Errors                                                     │
//! │  │   ├── CiphertextTooShort    - Shorter than the nonce                │
//! │  │   ├── EncryptionFailed      - AEAD seal failed                      │
//! │  │   ├── DecryptionFailed      - Opaque AEAD open failure              │
//! │  │   ├── InvalidKey            - Key material of the wrong length      │
//! │  │   └── RngFailed             - OS entropy source failed              │
//! │  │                                                                      │
//! │  ├── Config Errors                                                     │
//! │  │   └── InvalidConfig         - Missing / unparsable setting          │
//! │  │                                                                      │
//! │  └── Internal Errors                                                   │
//! │      └── Internal              - Worker panicked or was torn down      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mismatch vs. Format
//!
//! `HashMismatch` is returned both when the secret is wrong and when the
//! embedded parameters were altered, so callers get no oracle for which part
//! of a credential is wrong. `InvalidHashFormat` means the stored record
//! itself no longer parses and is worth alerting on.

use thiserror::Error;

/// Result type alias for Umbra Trust operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Umbra Trust
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Hashing Errors (100-199)
    // ========================================================================

    /// The serialized hash could not be parsed or failed validation
    #[error("Invalid hash format: {0}")]
    InvalidHashFormat(String),

    /// Derived hash did not match the stored hash
    #[error("Hashes do not match")]
    HashMismatch,

    /// The key derivation function rejected its inputs
    #[error("Failed to derive key: {0}")]
    KeyDerivationFailed(String),

    // ========================================================================
    // Token Errors (200-299)
    // ========================================================================

    /// The user handed to the issuer lacks an id or roles
    #[error("Invalid token content")]
    InvalidTokenContent,

    /// The token failed verification
    #[error("Token is invalid")]
    InvalidToken,

    /// The token is past its expiry (plus leeway)
    #[error("Token has expired")]
    ExpiredToken,

    /// Token signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// No bearer token was supplied
    #[error("No authorization credentials provided")]
    MissingCredentials,

    /// The user is authenticated but holds none of the required roles
    #[error("Access denied: {0}")]
    Forbidden(String),

    // ========================================================================
    // Crypto Errors (300-399)
    // ========================================================================

    /// Ciphertext is shorter than the nonce prefix
    #[error("Ciphertext too short")]
    CiphertextTooShort,

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, corruption, truncated tag)
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Invalid key format or length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Random number generation failed
    #[error("Random number generation failed")]
    RngFailed,

    // ========================================================================
    // Config Errors (400-499)
    // ========================================================================

    /// Configuration is missing a value or a value does not parse
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get a stable numeric code for the error
    ///
    /// Error codes are organized by category:
    /// - 100-199: Hashing
    /// - 200-299: Tokens
    /// - 300-399: Crypto
    /// - 400-499: Config
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Hashing (100-199)
            Error::InvalidHashFormat(_) => 100,
            Error::HashMismatch => 101,
            Error::KeyDerivationFailed(_) => 102,

            // Tokens (200-299)
            Error::InvalidTokenContent => 200,
            Error::InvalidToken => 201,
            Error::ExpiredToken => 202,
            Error::SigningFailed(_) => 203,
            Error::MissingCredentials => 204,
            Error::Forbidden(_) => 205,

            // Crypto (300-399)
            Error::CiphertextTooShort => 300,
            Error::EncryptionFailed(_) => 301,
            Error::DecryptionFailed => 302,
            Error::InvalidKey(_) => 303,
            Error::RngFailed => 304,

            // Config (400-499)
            Error::InvalidConfig(_) => 400,

            // Internal (900-999)
            Error::Internal(_) => 900,
        }
    }

    /// Check if this error points at a corrupted or tampered stored record
    /// rather than a failed authentication attempt
    pub fn indicates_tampering(&self) -> bool {
        matches!(self, Error::InvalidHashFormat(_))
    }

    /// Check if the caller should prompt the user to authenticate again
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, Error::ExpiredToken | Error::MissingCredentials)
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidHashFormat(format!("invalid hash, {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("hashing worker failed: {}", err))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidHashFormat("test".into()).code(), 100);
        assert_eq!(Error::HashMismatch.code(), 101);
        assert_eq!(Error::InvalidToken.code(), 201);
        assert_eq!(Error::ExpiredToken.code(), 202);
        assert_eq!(Error::CiphertextTooShort.code(), 300);
        assert_eq!(Error::InvalidConfig("test".into()).code(), 400);
        assert_eq!(Error::Internal("test".into()).code(), 900);
    }

    #[test]
    fn test_tampering_classification() {
        assert!(Error::InvalidHashFormat("bad N".into()).indicates_tampering());
        assert!(!Error::HashMismatch.indicates_tampering());
        assert!(!Error::InvalidToken.indicates_tampering());
    }

    #[test]
    fn test_reauthentication_classification() {
        assert!(Error::ExpiredToken.requires_reauthentication());
        assert!(Error::MissingCredentials.requires_reauthentication());
        assert!(!Error::InvalidToken.requires_reauthentication());
    }

    #[test]
    fn test_hex_error_is_format_error() {
        let err: Error = hex::decode("zz").unwrap_err().into();
        assert!(err.indicates_tampering());
    }
}
