//! # Credential Demo
//!
//! Walks one account through sign-up, login, an authorized request and
//! secret storage.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example credential_demo
//! ```

use std::sync::Arc;

use umbra_trust::crypto::{self, Argon2Hasher, Hasher, ScryptParams};
use umbra_trust::events::CountingSink;
use umbra_trust::{Credentials, HasherConfig, TrustConfig, TrustContext, User};

fn main() {
    println!("=== Umbra Trust: Credential Lifecycle Demo ===\n");

    let mut config = TrustConfig::new(Credentials::new("accounts", "demo-shared-secret"));
    config.hasher = HasherConfig::Scrypt(ScryptParams::default());

    let sink = Arc::new(CountingSink::new());
    let trust = TrustContext::with_sink(&config, sink.clone()).expect("Failed to build trust context");

    // Step 1: Sign-up
    println!("Step 1: Hashing the password at sign-up...");
    let salt = crypto::generate_salt().expect("Failed to generate salt");
    let stored = trust
        .hasher()
        .hash(b"correct horse battery staple", &salt)
        .expect("Failed to hash password");
    println!("  salt:   {}", hex::encode(&salt));
    println!("  stored: {}", String::from_utf8_lossy(&stored));
    println!();

    // Step 2: Login
    println!("Step 2: Verifying the password at login...");
    trust
        .hasher()
        .verify(b"correct horse battery staple", &salt, &stored)
        .expect("Password should verify");
    println!("  correct password: ok");
    let wrong = trust.hasher().verify(b"Tr0ub4dor&3", &salt, &stored);
    println!("  wrong password:   {:?}", wrong.err());
    println!();

    // Step 3: Migration
    println!("Step 3: A legacy Argon2id record still verifies...");
    let legacy = Argon2Hasher::new(1, 8 * 1024, 1, 32).expect("Valid Argon2 parameters");
    let legacy_record = legacy
        .hash(b"old password", &salt)
        .expect("Failed to hash legacy password");
    trust
        .hasher()
        .verify(b"old password", &salt, &legacy_record)
        .expect("Legacy record should verify");
    println!(
        "  needs rehash: {}",
        trust
            .hasher()
            .needs_rehash(&legacy_record)
            .expect("Record parses")
    );
    println!();

    // Step 4: Token
    println!("Step 4: Issuing a bearer token...");
    let user = User::new("user-42", ["USER", "ADMIN"]);
    let token = trust.issue(&user).expect("Failed to issue token");
    println!("  token: {}...", &token[..token.len().min(48)]);
    println!();

    // Step 5: Authorized request
    println!("Step 5: Authenticating a request...");
    let auth = trust.authenticator(["ADMIN"]).with_sink(sink.clone());
    let principal = auth
        .authenticate(&format!("Bearer {}", token))
        .expect("Request should be authorized");
    println!("  principal: {}", principal);
    let denied = trust
        .authenticator(["SYSTEM"])
        .with_sink(sink.clone())
        .authenticate(&format!("Bearer {}", token));
    println!("  SYSTEM-only route: {:?}", denied.err());
    println!();

    // Step 6: Secret at rest
    println!("Step 6: Encrypting an API key at rest...");
    let key = crypto::generate_aes_key().expect("Failed to generate key");
    let sealed = crypto::encrypt(&key, b"sk_live_0123456789").expect("Failed to encrypt");
    println!("  sealed ({} bytes): {}", sealed.len(), hex::encode(&sealed));
    let opened = crypto::decrypt(&key, &sealed).expect("Failed to decrypt");
    println!("  opened: {}", String::from_utf8_lossy(&opened));
    println!();

    println!("Events recorded:");
    let mut counts: Vec<_> = sink.snapshot().into_iter().collect();
    counts.sort();
    for (kind, count) in counts {
        println!("  {:<20} {}", kind, count);
    }
}
