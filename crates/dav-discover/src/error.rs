//! Error types for the discovery walk.

use thiserror::Error;

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors that can occur while walking the WebDAV discovery chain.
///
/// Absence of an optional element (no principal, no home-set) is *not* an
/// error; those cases yield an empty collection list instead.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The starting URL (or an href returned by the server) could not be
    /// parsed or resolved.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The trust-policy PEM bundle could not be read.
    #[error("cannot read trust bundle {path}: {source}")]
    TrustBundle {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Connection, DNS or other low-level transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// TLS handshake or certificate verification failure.
    ///
    /// Kept distinct from [`DiscoveryError::Network`] so callers can offer a
    /// trust-policy override and retry.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server rejected the credentials (HTTP 401 or 403).
    #[error("authentication failed (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The requested resource does not exist (HTTP 404).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body is not well-formed XML.
    #[error("malformed multistatus response: {0}")]
    Xml(String),

    /// A multistatus `response` element lacked the mandatory `href`.
    #[error("collection response missing required href")]
    MissingHref,
}

impl DiscoveryError {
    /// Returns true if the server rejected the supplied credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns true for certificate/TLS failures, where retrying with a
    /// different [`TrustPolicy`](crate::config::TrustPolicy) may help.
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}
