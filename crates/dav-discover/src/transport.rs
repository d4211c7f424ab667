//! PROPFIND transport.
//!
//! A thin wrapper around [`reqwest::Client`] that knows how to issue the
//! WebDAV extension method with a `Depth` header, basic credentials and the
//! session trust policy. No retry logic: a failed call aborts the current
//! discovery step and propagates.

use std::fs;

use reqwest::{Certificate, Client, Method, StatusCode};
use tracing::{trace, warn};
use url::Url;

use crate::config::{Credentials, DiscoveryConfig, TrustPolicy};
use crate::error::{DiscoveryError, DiscoveryResult};

pub(crate) struct DavTransport {
    client: Client,
    credentials: Option<Credentials>,
}

impl DavTransport {
    /// Builds the HTTP client once from the session configuration.
    pub fn new(config: &DiscoveryConfig) -> DiscoveryResult<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent());

        match config.trust_policy() {
            TrustPolicy::System => {}
            TrustPolicy::CustomBundle(path) => {
                let pem = fs::read(path).map_err(|source| DiscoveryError::TrustBundle {
                    path: path.clone(),
                    source,
                })?;
                let certs = Certificate::from_pem_bundle(&pem)
                    .map_err(|e| DiscoveryError::Tls(format!("invalid trust bundle: {e}")))?;
                for cert in certs {
                    builder = builder.add_root_certificate(cert);
                }
            }
            TrustPolicy::Insecure => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let client = builder
            .build()
            .map_err(|e| DiscoveryError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials: config.credentials().cloned(),
        })
    }

    /// Issues a PROPFIND against `url` and returns the response body.
    ///
    /// `depth` follows RFC 4918: `0` queries the resource itself, `1` the
    /// resource plus its immediate children.
    pub async fn propfind(&self, url: &Url, body: &str, depth: u8) -> DiscoveryResult<String> {
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|e| DiscoveryError::Network(format!("invalid HTTP method: {e}")))?;

        let mut request = self
            .client
            .request(method, url.clone())
            .header("Depth", depth.to_string())
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(body.to_string());

        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        trace!(%url, depth, "issuing PROPFIND");

        let response = request.send().await.map_err(classify_send_error)?;
        let status = response.status();
        trace!(%status, "received response");

        match status {
            s if s.is_success() => response
                .text()
                .await
                .map_err(|e| DiscoveryError::Network(format!("failed to read response: {e}"))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DiscoveryError::Unauthorized {
                status: status.as_u16(),
            }),
            StatusCode::NOT_FOUND => Err(DiscoveryError::NotFound(url.to_string())),
            s => {
                warn!(status = %s, %url, "unexpected response status");
                Err(DiscoveryError::UnexpectedStatus { status: s.as_u16() })
            }
        }
    }
}

/// Maps a reqwest send error onto the discovery taxonomy. Certificate
/// failures must stay distinguishable from generic transport failures so
/// callers can offer a trust-policy override.
fn classify_send_error(err: reqwest::Error) -> DiscoveryError {
    if err.is_timeout() {
        return DiscoveryError::Timeout;
    }
    if is_certificate_error(&err) {
        return DiscoveryError::Tls(err.to_string());
    }
    DiscoveryError::Network(err.to_string())
}

/// Walks the source chain looking for a TLS verification failure. reqwest
/// does not expose one directly, so this sniffs the rustls error text.
fn is_certificate_error(err: &reqwest::Error) -> bool {
    let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = cause {
        let msg = e.to_string();
        if msg.contains("certificate") || msg.contains("UnknownIssuer") || msg.contains("InvalidCertificate") {
            return true;
        }
        cause = e.source();
    }
    false
}
