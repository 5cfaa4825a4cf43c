//! Trust configuration.
//!
//! Loaded from JSON or from environment variables:
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `TRUST_ISSUER` | yes | |
//! | `TRUST_SECRET` | yes | |
//! | `TRUST_LEEWAY_SECS` | no | `60` |
//! | `TRUST_TOKEN_LIFETIME_SECS` | no | `3600` |
//! | `TRUST_HASHER` | no | `scrypt` (`argon2id`, `scrypt`, `hmac-sha256`) |

use std::env;

use serde::{Deserialize, Serialize};

use crate::crypto::{Argon2Params, ScryptParams};
use crate::error::{Error, Result};
use crate::token::{Credentials, DEFAULT_LEEWAY_SECS};

/// Token lifetime when none is configured
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Which hasher mints new password hashes, with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "kebab-case")]
pub enum HasherConfig {
    /// Argon2id
    Argon2id(Argon2Params),
    /// scrypt
    Scrypt(ScryptParams),
    /// HMAC-SHA256
    HmacSha256,
}

impl Default for HasherConfig {
    fn default() -> Self {
        HasherConfig::Scrypt(ScryptParams::default())
    }
}

impl HasherConfig {
    /// Default configuration for an algorithm name
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "argon2id" => Ok(HasherConfig::Argon2id(Argon2Params::default())),
            "scrypt" => Ok(HasherConfig::Scrypt(ScryptParams::default())),
            "hmac-sha256" => Ok(HasherConfig::HmacSha256),
            other => Err(Error::InvalidConfig(format!(
                "unknown hasher {:?}, expected argon2id, scrypt or hmac-sha256",
                other
            ))),
        }
    }
}

/// Everything needed to build a [`TrustContext`](crate::TrustContext)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Token issuer name and shared secret
    pub credentials: Credentials,

    /// Tolerated clock drift past token expiry, in seconds
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: i64,

    /// Lifetime of issued tokens, in seconds
    #[serde(default = "default_token_lifetime_secs")]
    pub token_lifetime_secs: i64,

    /// Password hasher for new credentials
    #[serde(default)]
    pub hasher: HasherConfig,
}

fn default_leeway_secs() -> i64 {
    DEFAULT_LEEWAY_SECS
}

fn default_token_lifetime_secs() -> i64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

impl TrustConfig {
    /// Configuration with default timings and hasher
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            leeway_secs: DEFAULT_LEEWAY_SECS,
            token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            hasher: HasherConfig::default(),
        }
    }

    /// Parse configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| Error::InvalidConfig(format!("{} is not set", key)))
        };

        let mut config = Self::new(Credentials::new(
            require("TRUST_ISSUER")?,
            require("TRUST_SECRET")?,
        ));

        if let Some(value) = get("TRUST_LEEWAY_SECS") {
            config.leeway_secs = parse_secs("TRUST_LEEWAY_SECS", &value)?;
        }
        if let Some(value) = get("TRUST_TOKEN_LIFETIME_SECS") {
            config.token_lifetime_secs = parse_secs("TRUST_TOKEN_LIFETIME_SECS", &value)?;
        }
        if let Some(value) = get("TRUST_HASHER") {
            config.hasher = HasherConfig::from_name(&value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce working components
    pub fn validate(&self) -> Result<()> {
        if self.credentials.issuer.is_empty() {
            return Err(Error::InvalidConfig("issuer must not be empty".into()));
        }
        if self.credentials.secret.is_empty() {
            return Err(Error::InvalidConfig("secret must not be empty".into()));
        }
        if self.leeway_secs < 0 {
            return Err(Error::InvalidConfig("leeway must not be negative".into()));
        }
        Ok(())
    }

    /// Expiry leeway as a duration
    pub fn leeway(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.leeway_secs)
    }

    /// Token lifetime as a duration
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_lifetime_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::InvalidConfig(format!("{}: {}", key, e)))
}
