//! HS256 token issuer.

use std::fmt;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use super::{Credentials, Issuer, TokenClaims, User};
use crate::error::{Error, Result};
use crate::events::{default_sink, SharedSink, TrustEvent};
use crate::time::{now_timestamp, offset_timestamp};

/// Signs [`TokenClaims`] with a shared secret
#[derive(Clone)]
pub struct JwtIssuer {
    name: String,
    key: EncodingKey,
    sink: SharedSink,
}

impl JwtIssuer {
    /// Create an issuer from credentials, reporting to [`TracingSink`](crate::events::TracingSink)
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            name: credentials.issuer.clone(),
            key: EncodingKey::from_secret(credentials.secret.as_bytes()),
            sink: default_sink(),
        }
    }

    /// Replace the event sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Issuer name written into `iss`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Issue a token as if the current time were `now` (Unix seconds)
    pub fn issue_at(&self, user: &User, lifetime: chrono::Duration, now: i64) -> Result<String> {
        if user.id.is_empty() || user.roles.is_empty() {
            let err = Error::InvalidTokenContent;
            self.sink.record(&TrustEvent::IssueRejected { code: err.code() });
            return Err(err);
        }

        let expires_at = offset_timestamp(now, lifetime);
        let claims = TokenClaims::for_user(&self.name, user, now, expires_at);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key).map_err(|e| {
            let err = Error::SigningFailed(e.to_string());
            self.sink.record(&TrustEvent::IssueRejected { code: err.code() });
            err
        })?;

        self.sink.record(&TrustEvent::TokenIssued {
            subject: user.id.clone(),
            expires_at,
        });

        Ok(token)
    }
}

impl Issuer for JwtIssuer {
    fn issue(&self, user: &User, lifetime: chrono::Duration) -> Result<String> {
        self.issue_at(user, lifetime, now_timestamp())
    }
}

impl fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoopSink;
    use std::sync::Arc;

    #[test]
    fn test_token_has_three_segments() {
        let issuer = JwtIssuer::new(&Credentials::new("svc", "secret")).with_sink(Arc::new(NoopSink));
        let token = issuer
            .issue(&User::new("u", ["USER"]), chrono::Duration::hours(1))
            .unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(issuer.name(), "svc");
    }

    #[test]
    fn test_claims_written() {
        let credentials = Credentials::new("svc", "secret");
        let issuer = JwtIssuer::new(&credentials).with_sink(Arc::new(NoopSink));
        let token = issuer
            .issue_at(&User::new("u", ["A", "B"]), chrono::Duration::seconds(90), 5_000)
            .unwrap();

        let mut validation = jsonwebtoken::Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data = jsonwebtoken::decode::<TokenClaims>(
            &token,
            &jsonwebtoken::DecodingKey::from_secret(b"secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(data.header.alg, Algorithm::HS256);
        assert_eq!(data.claims.iss, "svc");
        assert_eq!(data.claims.sub, "u");
        assert_eq!(data.claims.iat, Some(5_000));
        assert_eq!(data.claims.nbf, Some(4_940));
        assert_eq!(data.claims.exp, Some(5_090));
        assert_eq!(data.claims.role, "A;B");
    }

    #[test]
    fn test_debug_hides_key() {
        let issuer = JwtIssuer::new(&Credentials::new("svc", "hunter2"));
        let rendered = format!("{:?}", issuer);
        assert!(rendered.contains("svc"));
        assert!(!rendered.contains("hunter2"));
    }
}
