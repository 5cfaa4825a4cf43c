//! HS256 token verifier.

use std::fmt;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::{Credentials, TokenClaims, User, Verifier};
use crate::error::{Error, Result};
use crate::events::{default_sink, SharedSink, TrustEvent};
use crate::time::{now_timestamp, offset_timestamp};

/// Leeway applied past expiry when none is configured
pub const DEFAULT_LEEWAY_SECS: i64 = 60;

/// Validates tokens minted by a [`JwtIssuer`](super::JwtIssuer) holding the
/// same credentials
#[derive(Clone)]
pub struct JwtVerifier {
    expected_issuer: String,
    key: DecodingKey,
    validation: Validation,
    leeway: chrono::Duration,
    sink: SharedSink,
}

impl JwtVerifier {
    /// Create a verifier tolerating `leeway` of clock drift past expiry
    pub fn new(credentials: &Credentials, leeway: chrono::Duration) -> Self {
        // Signature and algorithm only; time and issuer are checked below so
        // each failure maps onto the right error.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            expected_issuer: credentials.issuer.clone(),
            key: DecodingKey::from_secret(credentials.secret.as_bytes()),
            validation,
            leeway,
            sink: default_sink(),
        }
    }

    /// Replace the event sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Configured expiry leeway
    pub fn leeway(&self) -> chrono::Duration {
        self.leeway
    }

    /// Verify a token as if the current time were `now` (Unix seconds)
    pub fn verify_at(&self, token: &str, now: i64) -> Result<User> {
        match self.check(token, now) {
            Ok(user) => {
                self.sink.record(&TrustEvent::TokenVerified {
                    subject: user.id.clone(),
                });
                Ok(user)
            }
            Err(err) => {
                self.sink.record(&TrustEvent::TokenRejected { code: err.code() });
                Err(err)
            }
        }
    }

    fn check(&self, token: &str, now: i64) -> Result<User> {
        let claims = decode::<TokenClaims>(token, &self.key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token failed to decode");
                Error::InvalidToken
            })?
            .claims;

        if claims.iss != self.expected_issuer {
            return Err(Error::InvalidToken);
        }

        if let Some(nbf) = claims.nbf {
            if now < nbf {
                return Err(Error::InvalidToken);
            }
        }

        let exp = claims.exp.ok_or(Error::InvalidToken)?;
        if now > offset_timestamp(exp, self.leeway) {
            return Err(Error::ExpiredToken);
        }

        if claims.sub.is_empty() {
            return Err(Error::InvalidToken);
        }

        Ok(claims.to_user())
    }
}

impl Verifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<User> {
        self.verify_at(token, now_timestamp())
    }
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("expected_issuer", &self.expected_issuer)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoopSink;
    use crate::token::{Issuer, JwtIssuer};
    use std::sync::Arc;

    #[test]
    fn test_not_yet_valid_token() {
        let credentials = Credentials::new("svc", "secret");
        let issuer = JwtIssuer::new(&credentials).with_sink(Arc::new(NoopSink));
        let verifier = JwtVerifier::new(&credentials, chrono::Duration::minutes(1))
            .with_sink(Arc::new(NoopSink));

        // Minted ten minutes in the future: outside the one-minute back-dating.
        let now = now_timestamp();
        let token = issuer
            .issue_at(&User::new("u", ["USER"]), chrono::Duration::hours(1), now + 600)
            .unwrap();

        assert!(matches!(verifier.verify(&token), Err(Error::InvalidToken)));
    }

    #[test]
    fn test_fresh_token_verifies_now() {
        let credentials = Credentials::new("svc", "secret");
        let token = JwtIssuer::new(&credentials)
            .issue(&User::new("u", ["USER"]), chrono::Duration::minutes(5))
            .unwrap();

        let user = JwtVerifier::new(&credentials, chrono::Duration::seconds(DEFAULT_LEEWAY_SECS))
            .verify(&token)
            .unwrap();
        assert_eq!(user, User::new("u", ["USER"]));
    }

    #[test]
    fn test_expired_beats_wrong_subject() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let credentials = Credentials::new("svc", "secret");
        let claims = TokenClaims {
            iss: "svc".into(),
            exp: Some(100),
            ..TokenClaims::default()
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();

        let verifier = JwtVerifier::new(&credentials, chrono::Duration::zero());
        assert!(matches!(verifier.verify_at(&token, 101), Err(Error::ExpiredToken)));
        assert!(matches!(verifier.verify_at(&token, 100), Err(Error::InvalidToken)));
    }
}
