//! Umbra Trust CLI
//!
//! Operator tool over the `umbra-trust` library:
//!
//! 1. **Passwords**: generate salts, hash and verify passwords with any
//!    configured hasher.
//!
//! 2. **Tokens**: mint and check HS256 bearer tokens.
//!
//! 3. **Secrets**: generate AES-256 keys, encrypt and decrypt payloads.
//!
//! Binary values (salts, raw hashes) are hex; keys and ciphertexts are
//! standard base64. Failures print `[code] message` and exit non-zero.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::{Args, Parser, Subcommand};

use umbra_trust::crypto::{self, hasher::offload, CipherKey, SALT_SIZE};
use umbra_trust::{
    Credentials, Error, HasherConfig, Issuer, JwtIssuer, JwtVerifier, PasswordHasher, Result,
    User, Verifier,
};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "umbra-trust", version, about = "Umbra credential and trust tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a random salt as hex
    Salt {
        /// Salt length in bytes
        #[arg(long, default_value_t = SALT_SIZE)]
        size: usize,
    },

    /// Hash a password
    Hash {
        #[command(flatten)]
        hasher: HasherArgs,

        /// Password to hash
        #[arg(long, env = "TRUST_PASSWORD")]
        password: String,

        /// Salt as hex; a fresh one is generated and printed when omitted
        #[arg(long)]
        salt: Option<String>,
    },

    /// Verify a password against a stored hash
    Verify {
        #[command(flatten)]
        hasher: HasherArgs,

        /// Password to check
        #[arg(long, env = "TRUST_PASSWORD")]
        password: String,

        /// Salt as hex
        #[arg(long)]
        salt: String,

        /// Stored hash (tagged text, or hex for hmac-sha256)
        #[arg(long)]
        hash: String,
    },

    /// Print a new AES-256 key as base64
    Keygen,

    /// Encrypt a UTF-8 payload
    Encrypt {
        /// Key as base64
        #[arg(long, env = "TRUST_CIPHER_KEY")]
        key: String,

        /// Payload to encrypt
        #[arg(long)]
        plaintext: String,
    },

    /// Decrypt a base64 ciphertext
    Decrypt {
        /// Key as base64
        #[arg(long, env = "TRUST_CIPHER_KEY")]
        key: String,

        /// Ciphertext as base64
        #[arg(long)]
        ciphertext: String,
    },

    /// Issue a bearer token
    Issue {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Subject (user id)
        #[arg(long)]
        id: String,

        /// Roles (comma-separated or repeated)
        #[arg(long = "role", value_delimiter = ',')]
        roles: Vec<String>,

        /// Token lifetime in seconds
        #[arg(long, default_value_t = 3600, env = "TRUST_TOKEN_LIFETIME_SECS")]
        lifetime_secs: i64,
    },

    /// Verify a bearer token and print its user
    VerifyToken {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Token to verify
        #[arg(long)]
        token: String,

        /// Tolerated clock drift past expiry, in seconds
        #[arg(long, default_value_t = 60, env = "TRUST_LEEWAY_SECS")]
        leeway_secs: i64,
    },
}

#[derive(Args, Debug)]
struct HasherArgs {
    /// Hashing algorithm: argon2id, scrypt or hmac-sha256
    #[arg(long, default_value = "scrypt", env = "TRUST_HASHER")]
    algorithm: String,
}

#[derive(Args, Debug)]
struct CredentialArgs {
    /// Issuer name
    #[arg(long, env = "TRUST_ISSUER")]
    issuer: String,

    /// Shared HMAC secret
    #[arg(long, env = "TRUST_SECRET", hide_env_values = true)]
    secret: String,
}

impl HasherArgs {
    fn build(&self) -> Result<PasswordHasher> {
        PasswordHasher::from_config(&HasherConfig::from_name(&self.algorithm)?)
    }
}

impl CredentialArgs {
    fn credentials(&self) -> Credentials {
        Credentials::new(self.issuer.clone(), self.secret.clone())
    }
}

// ── Entry Point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "umbra_trust=info,umbra_trust_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli.command).await {
        eprintln!("[{}] {}", err.code(), err);
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Salt { size } => {
            println!("{}", hex::encode(crypto::random_bytes(size)?));
        }

        Command::Hash {
            hasher,
            password,
            salt,
        } => {
            let hasher = hasher.build()?;
            let salt = match salt {
                Some(salt) => decode_hex("salt", &salt)?,
                None => {
                    let salt = crypto::generate_salt()?;
                    println!("salt: {}", hex::encode(&salt));
                    salt
                }
            };

            let hash = offload::hash(hasher.clone(), password.into_bytes(), salt).await?;
            println!("{}", render_hash(&hasher, &hash));
        }

        Command::Verify {
            hasher,
            password,
            salt,
            hash,
        } => {
            let hasher = hasher.build()?;
            let salt = decode_hex("salt", &salt)?;
            let stored = match &hasher {
                PasswordHasher::HmacSha256(_) => decode_hex("hash", &hash)?,
                _ => hash.into_bytes(),
            };

            offload::verify(hasher.clone(), password.into_bytes(), salt, stored.clone()).await?;
            println!("ok");

            if hasher.needs_rehash(&stored)? {
                tracing::info!(
                    hasher = hasher.algorithm_name(),
                    "Stored hash uses outdated parameters"
                );
            }
        }

        Command::Keygen => {
            let key = crypto::generate_aes_key()?;
            println!("{}", BASE64.encode(key.as_bytes()));
        }

        Command::Encrypt { key, plaintext } => {
            let key = decode_key(&key)?;
            let sealed = crypto::encrypt(&key, plaintext.as_bytes())?;
            println!("{}", BASE64.encode(sealed));
        }

        Command::Decrypt { key, ciphertext } => {
            let key = decode_key(&key)?;
            let sealed = BASE64
                .decode(ciphertext.trim())
                .map_err(|_| Error::DecryptionFailed)?;
            let plaintext = crypto::decrypt(&key, &sealed)?;

            match String::from_utf8(plaintext) {
                Ok(text) => println!("{}", text),
                Err(err) => println!("{}", hex::encode(err.into_bytes())),
            }
        }

        Command::Issue {
            credentials,
            id,
            roles,
            lifetime_secs,
        } => {
            let issuer = JwtIssuer::new(&credentials.credentials());
            let user = User::new(id, roles);
            let token = issuer.issue(&user, chrono::Duration::seconds(lifetime_secs))?;
            println!("{}", token);
        }

        Command::VerifyToken {
            credentials,
            token,
            leeway_secs,
        } => {
            let verifier = JwtVerifier::new(
                &credentials.credentials(),
                chrono::Duration::seconds(leeway_secs),
            );
            let user = verifier.verify(token.trim())?;
            println!("{}", user);
        }
    }

    Ok(())
}

// ── Encoding Helpers ──────────────────────────────────────────────────────────

fn render_hash(hasher: &PasswordHasher, hash: &[u8]) -> String {
    match hasher {
        PasswordHasher::HmacSha256(_) => hex::encode(hash),
        _ => String::from_utf8_lossy(hash).into_owned(),
    }
}

fn decode_hex(name: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim())
        .map_err(|e| Error::InvalidConfig(format!("{} is not valid hex: {}", name, e)))
}

fn decode_key(value: &str) -> Result<CipherKey> {
    let bytes = BASE64
        .decode(value.trim())
        .map_err(|e| Error::InvalidKey(format!("key is not valid base64: {}", e)))?;
    CipherKey::from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue_roles() {
        let cli = Cli::try_parse_from([
            "umbra-trust",
            "issue",
            "--issuer",
            "svc",
            "--secret",
            "s",
            "--id",
            "user-1",
            "--role",
            "ADMIN,USER",
        ])
        .unwrap();

        match cli.command {
            Command::Issue { id, roles, .. } => {
                assert_eq!(id, "user-1");
                assert_eq!(roles, vec!["ADMIN", "USER"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_render_hash() {
        let hmac = PasswordHasher::HmacSha256(crypto::Sha256Hasher);
        assert_eq!(render_hash(&hmac, &[0xab, 0xcd]), "abcd");

        let scrypt = PasswordHasher::default();
        assert_eq!(render_hash(&scrypt, b"SCRYPT$1"), "SCRYPT$1");
    }

    #[test]
    fn test_decode_key() {
        let key = crypto::generate_aes_key().unwrap();
        let encoded = BASE64.encode(key.as_bytes());
        assert_eq!(decode_key(&encoded).unwrap().as_bytes(), key.as_bytes());
        assert!(matches!(decode_key("AAAA"), Err(Error::InvalidKey(_))));
        assert!(matches!(decode_key("***"), Err(Error::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_run_hash_then_verify() {
        let salt = "00112233445566778899aabbccddeeff".to_string();
        run(Command::Hash {
            hasher: HasherArgs {
                algorithm: "hmac-sha256".into(),
            },
            password: "pw".into(),
            salt: Some(salt.clone()),
        })
        .await
        .unwrap();

        let hasher = PasswordHasher::HmacSha256(crypto::Sha256Hasher);
        let hash = umbra_trust::Hasher::hash(&hasher, b"pw", &hex::decode(&salt).unwrap()).unwrap();

        let verified = run(Command::Verify {
            hasher: HasherArgs {
                algorithm: "hmac-sha256".into(),
            },
            password: "pw".into(),
            salt: salt.clone(),
            hash: hex::encode(&hash),
        })
        .await;
        assert!(verified.is_ok());

        let rejected = run(Command::Verify {
            hasher: HasherArgs {
                algorithm: "hmac-sha256".into(),
            },
            password: "wrong".into(),
            salt,
            hash: hex::encode(&hash),
        })
        .await;
        assert!(matches!(rejected, Err(Error::HashMismatch)));
    }
}
