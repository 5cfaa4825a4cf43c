//! # Trust Events
//!
//! Events emitted by the token issuer, verifier and role guard.
//!
//! Components never reach for a global logger. Each one holds an
//! `Arc<dyn EventSink>` handed in at construction, so tests can count what
//! happened and services can route events wherever they like.
//!
//! ```text
//! JwtIssuer ──┐
//! JwtVerifier ├──► EventSink::record(&TrustEvent) ──► TracingSink  (default)
//! RoleGuard ──┘                                   ├─► CountingSink (metrics, tests)
//!                                                 └─► NoopSink
//! ```
//!
//! Events carry subjects and error codes only. Tokens, secrets and
//! plaintexts never reach a sink.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Events emitted by trust components
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustEvent {
    /// A token was signed
    TokenIssued {
        /// Subject (user id) the token was minted for
        subject: String,
        /// Expiry as Unix seconds
        expires_at: i64,
    },

    /// The issuer refused to mint a token
    IssueRejected {
        /// Error code of the refusal
        code: i32,
    },

    /// A token passed verification
    TokenVerified {
        /// Subject carried by the token
        subject: String,
    },

    /// A token failed verification
    TokenRejected {
        /// Error code of the rejection
        code: i32,
    },

    /// A request arrived without a bearer token
    CredentialsMissing,

    /// The user holds at least one allowed role
    AccessGranted {
        /// The authorized user's id
        subject: String,
    },

    /// The user holds none of the allowed roles
    AccessDenied {
        /// The rejected user's id
        subject: String,
    },
}

impl TrustEvent {
    /// Stable snake_case name, used as a metric key
    pub fn kind(&self) -> &'static str {
        match self {
            TrustEvent::TokenIssued { .. } => "token_issued",
            TrustEvent::IssueRejected { .. } => "issue_rejected",
            TrustEvent::TokenVerified { .. } => "token_verified",
            TrustEvent::TokenRejected { .. } => "token_rejected",
            TrustEvent::CredentialsMissing => "credentials_missing",
            TrustEvent::AccessGranted { .. } => "access_granted",
            TrustEvent::AccessDenied { .. } => "access_denied",
        }
    }
}

/// Receiver for [`TrustEvent`]s
pub trait EventSink: Send + Sync {
    /// Record a single event. Must not block for long.
    fn record(&self, event: &TrustEvent);
}

/// Shared handle to a sink
pub type SharedSink = Arc<dyn EventSink>;

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &TrustEvent) {
        match event {
            TrustEvent::TokenIssued { subject, expires_at } => {
                tracing::info!(subject = %subject, expires_at, "Token issued");
            }
            TrustEvent::IssueRejected { code } => {
                tracing::warn!(code, "Token issuance rejected");
            }
            TrustEvent::TokenVerified { subject } => {
                tracing::debug!(subject = %subject, "Token verified");
            }
            TrustEvent::TokenRejected { code } => {
                tracing::warn!(code, "Token rejected");
            }
            TrustEvent::CredentialsMissing => {
                tracing::debug!("Request without credentials");
            }
            TrustEvent::AccessGranted { subject } => {
                tracing::debug!(subject = %subject, "Access granted");
            }
            TrustEvent::AccessDenied { subject } => {
                tracing::warn!(subject = %subject, "Access denied");
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: &TrustEvent) {}
}

/// Counts events by [`TrustEvent::kind`]
#[derive(Debug, Default)]
pub struct CountingSink {
    counts: Mutex<HashMap<&'static str, u64>>,
}

impl CountingSink {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// How many events of `kind` were recorded
    pub fn count(&self, kind: &str) -> u64 {
        self.counts.lock().get(kind).copied().unwrap_or(0)
    }

    /// Total events recorded
    pub fn total(&self) -> u64 {
        self.counts.lock().values().sum()
    }

    /// Copy of all counters
    pub fn snapshot(&self) -> HashMap<&'static str, u64> {
        self.counts.lock().clone()
    }
}

impl EventSink for CountingSink {
    fn record(&self, event: &TrustEvent) {
        *self.counts.lock().entry(event.kind()).or_insert(0) += 1;
    }
}

/// The sink components use when none is supplied
pub fn default_sink() -> SharedSink {
    Arc::new(TracingSink)
}
