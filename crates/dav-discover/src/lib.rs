//! CalDAV and CardDAV collection discovery.
//!
//! Given a starting URL and optional credentials, this crate walks the
//! WebDAV discovery chain of RFC 4918/4791/6352 and returns the user's
//! calendar and address book collections:
//!
//! ```text
//! starting URL ──PROPFIND Depth:0──▶ current-user-principal
//!    principal ──PROPFIND Depth:0──▶ calendar-home-set / addressbook-home-set
//!     home-set ──PROPFIND Depth:1──▶ typed collections
//! ```
//!
//! Response parsing matches elements by local tag name only, because servers
//! are free to pick arbitrary namespace prefixes for the same standard
//! element. A server that advertises no principal or no home-set for a kind
//! yields an empty result rather than an error.
//!
//! # Example
//!
//! ```ignore
//! use dav_discover::{DiscoveryConfig, Discoverer, ResourceKind};
//!
//! let config = DiscoveryConfig::new("dav.example.com")?
//!     .with_credentials("alice", "secret");
//! let discoverer = Discoverer::new(config)?;
//!
//! let calendars = discoverer.discover(ResourceKind::Calendar).await?;
//! for calendar in calendars {
//!     println!("{} ({})", calendar.display_name, calendar.href);
//! }
//! ```

pub mod config;
pub mod discover;
pub mod error;
pub mod profile;
mod transport;
pub mod xml;

// Re-export main types at crate root
pub use config::{Credentials, DiscoveryConfig, TrustPolicy};
pub use discover::{Collection, Discovered, Discoverer};
pub use error::{DiscoveryError, DiscoveryResult};
pub use profile::ResourceKind;
