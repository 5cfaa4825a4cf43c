//! scrypt password hashing.

use serde::{Deserialize, Serialize};

use super::format::{invalid, parse_component, DerivedKey, KeyParams};
use super::{verify_tagged, Hasher};
use crate::error::{Error, Result};

// scrypt::Params carries an output length used only by its PHC string API.
// Raw derivation writes into a caller-sized buffer, so any valid value works.
const PARAMS_OUTPUT_LEN: usize = 32;

/// scrypt cost parameters
///
/// Serialized as `SCRYPT$<N>$<r>$<p>$<keyLen>$<hex>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScryptParams {
    /// CPU/memory cost factor; must be 2^x with x a positive integer
    pub n: u64,
    /// Block size
    pub r: u32,
    /// Parallelization factor
    pub p: u32,
    /// Output length in bytes
    pub key_len: usize,
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            n: 16384,
            r: 8,
            p: 1,
            key_len: 32,
        }
    }
}

impl ScryptParams {
    /// Check the parameters against the scrypt domain and convert them
    pub fn validate(&self) -> std::result::Result<scrypt::Params, String> {
        let log_n = log2_exact(self.n).ok_or_else(|| {
            "invalid N, should satisfy N = 2^x where x is a positive integer".to_string()
        })?;
        if self.r == 0 {
            return Err("invalid r, must be greater than 0".into());
        }
        if self.p == 0 {
            return Err("invalid p, must be greater than 0".into());
        }
        if self.key_len == 0 {
            return Err("invalid key length, must be greater than 0".into());
        }

        scrypt::Params::new(log_n, self.r, self.p, PARAMS_OUTPUT_LEN)
            .map_err(|e| format!("invalid scrypt parameters, {}", e))
    }

    /// Parse the four numeric components `N$r$p$keyLen`
    pub(super) fn parse(components: &[&str]) -> Result<Self> {
        let params = Self {
            n: parse_component(components[0], "N")?,
            r: parse_component(components[1], "r")?,
            p: parse_component(components[2], "p")?,
            key_len: parse_component(components[3], "keylen")?,
        };

        params.validate().map_err(invalid)?;

        Ok(params)
    }

    /// Derive `key_len` bytes from plaintext and salt
    pub fn derive(&self, plaintext: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        let params = self.validate().map_err(Error::KeyDerivationFailed)?;

        let mut out = vec![0u8; self.key_len];
        scrypt::scrypt(plaintext, salt, &params, &mut out)
            .map_err(|e| Error::KeyDerivationFailed(e.to_string()))?;

        Ok(out)
    }
}

/// `Some(x)` when `n == 2^x` for a positive integer `x`.
fn log2_exact(n: u64) -> Option<u8> {
    if n < 2 || !n.is_power_of_two() {
        return None;
    }
    u8::try_from(n.trailing_zeros()).ok()
}

/// [`Hasher`] using the scrypt key derivation function
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScryptHasher {
    params: ScryptParams,
}

impl ScryptHasher {
    /// Create a scrypt hasher, rejecting parameters outside the scrypt domain
    pub fn new(n: u64, r: u32, p: u32, key_len: usize) -> Result<Self> {
        Self::with_params(ScryptParams { n, r, p, key_len })
    }

    /// Create a scrypt hasher from a parameter set
    pub fn with_params(params: ScryptParams) -> Result<Self> {
        params
            .validate()
            .map_err(|e| Error::InvalidConfig(format!("scrypt parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// The parameters new hashes are minted with
    pub fn params(&self) -> &ScryptParams {
        &self.params
    }
}

impl Hasher for ScryptHasher {
    fn hash(&self, plaintext: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        let key = DerivedKey::derive(KeyParams::Scrypt(self.params), plaintext, salt)?;
        Ok(key.to_string().into_bytes())
    }

    fn verify(&self, plaintext: &[u8], salt: &[u8], hashtext: &[u8]) -> Result<()> {
        verify_tagged(plaintext, salt, hashtext)
    }
}
