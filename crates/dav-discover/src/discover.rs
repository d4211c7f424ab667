//! The discovery walker: principal → home-set → typed collections.
//!
//! A strict forward chain with no backward transitions. Each step's request
//! target is derived from the previous step's response, so one kind's walk is
//! sequential; the two kinds are independent and run concurrently in
//! [`Discoverer::discover_all`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::profile::{PRINCIPAL_REQUEST, ResourceKind};
use crate::transport::DavTransport;
use crate::xml;

/// A discovered calendar or address book collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Server-relative path of the collection.
    pub href: String,
    /// Display name advertised by the server; empty when none is set.
    pub display_name: String,
    /// Which profile classified the collection.
    pub kind: ResourceKind,
    /// Calendar component names (`VEVENT`, `VTODO`, ...) the collection
    /// accepts, in document order. Always empty for address books.
    pub supported_components: Vec<String>,
}

/// The result of running both profiles against one server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Discovered {
    /// CalDAV calendar collections.
    pub calendars: Vec<Collection>,
    /// CardDAV address book collections.
    pub address_books: Vec<Collection>,
}

/// Walks the WebDAV discovery chain against one server.
///
/// Holds only immutable session state (configuration and the HTTP client);
/// all methods take `&self` and may run concurrently.
pub struct Discoverer {
    config: DiscoveryConfig,
    transport: DavTransport,
}

impl Discoverer {
    /// Creates a walker for the given session configuration.
    pub fn new(config: DiscoveryConfig) -> DiscoveryResult<Self> {
        let transport = DavTransport::new(&config)?;
        Ok(Self { config, transport })
    }

    /// Discovers all collections of one resource kind.
    ///
    /// Returns an empty list (not an error) when the server advertises no
    /// principal or no home-set for this kind. Order follows the server's
    /// response document order.
    pub async fn discover(&self, kind: ResourceKind) -> DiscoveryResult<Vec<Collection>> {
        let Some(principal) = self.find_principal().await? else {
            debug!(%kind, "server did not advertise a current-user-principal");
            return Ok(Vec::new());
        };
        let Some(home) = self.find_home_set(kind, &principal).await? else {
            debug!(%kind, principal = %principal, "no home-set advertised for this kind");
            return Ok(Vec::new());
        };
        self.enumerate(kind, &home).await
    }

    /// Runs both profiles concurrently against the same endpoint.
    ///
    /// The two walks share only the immutable session configuration, so no
    /// locking is involved. A failure in either walk surfaces here; it is
    /// never silently replaced by the other kind's result.
    pub async fn discover_all(&self) -> DiscoveryResult<Discovered> {
        let (calendars, address_books) = tokio::join!(
            self.discover(ResourceKind::Calendar),
            self.discover(ResourceKind::AddressBook),
        );
        Ok(Discovered {
            calendars: calendars?,
            address_books: address_books?,
        })
    }

    /// Step 1: PROPFIND Depth 0 against the starting URL for
    /// `current-user-principal`.
    async fn find_principal(&self) -> DiscoveryResult<Option<String>> {
        let body = self
            .transport
            .propfind(self.config.url(), PRINCIPAL_REQUEST, 0)
            .await?;
        let root = xml::parse(&body)?;

        // Servers may echo redundant hrefs; the first in document order wins.
        let principal = root
            .find_all("current-user-principal")
            .first()
            .and_then(|el| el.first_text_descendant("href"))
            .map(str::to_string);

        if let Some(p) = &principal {
            debug!(principal = %p, "located principal");
        }
        Ok(principal)
    }

    /// Step 2: PROPFIND Depth 0 against the principal for the kind's
    /// home-set property.
    async fn find_home_set(
        &self,
        kind: ResourceKind,
        principal: &str,
    ) -> DiscoveryResult<Option<String>> {
        let target = self.config.resolve(principal)?;
        let body = self
            .transport
            .propfind(&target, kind.home_set_request_body(), 0)
            .await?;
        let root = xml::parse(&body)?;

        let home = root
            .find_all(kind.home_set_local_name())
            .first()
            .and_then(|el| el.first_text_descendant("href"))
            .map(str::to_string);

        if let Some(h) = &home {
            debug!(%kind, home = %h, "located home-set");
        }
        Ok(home)
    }

    /// Step 3: PROPFIND Depth 1 against the home-set; classify each
    /// `response` entry and keep the matching ones.
    async fn enumerate(&self, kind: ResourceKind, home: &str) -> DiscoveryResult<Vec<Collection>> {
        let target = self.config.resolve(home)?;
        let body = self
            .transport
            .propfind(&target, kind.collection_request_body(), 1)
            .await?;
        let root = xml::parse(&body)?;

        let mut collections = Vec::new();
        for response in root.find_all("response") {
            // href is mandatory for every response entry, classified or not;
            // its absence means the server sent a broken multistatus.
            let Some(href) = response.first_text_descendant("href") else {
                return Err(DiscoveryError::MissingHref);
            };
            if !kind.matches(response) {
                // Non-matching WebDAV resources, typically the home itself.
                continue;
            }
            let display_name = response
                .find_all("displayname")
                .first()
                .map(|el| el.text().to_string())
                .unwrap_or_default();
            collections.push(Collection {
                href: href.to_string(),
                display_name,
                kind,
                supported_components: kind.supported_components(response),
            });
        }

        info!(%kind, count = collections.len(), "discovery finished");
        Ok(collections)
    }
}
