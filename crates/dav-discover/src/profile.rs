//! Resource-kind profiles for the discovery walk.
//!
//! Each kind is a pure configuration bundle: fixed PROPFIND request bodies,
//! the local tag name of the home-set property, a classification filter over
//! `resourcetype`, and (calendar only) component-set extraction. The walker
//! itself is kind-agnostic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::xml::Element;

/// PROPFIND body requesting the authenticated principal (RFC 5397), shared
/// by both resource kinds.
pub(crate) const PRINCIPAL_REQUEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:">
  <d:prop>
    <d:current-user-principal />
  </d:prop>
</d:propfind>"#;

const CALENDAR_HOME_REQUEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
  <d:prop>
    <c:calendar-home-set />
  </d:prop>
</d:propfind>"#;

const ADDRESSBOOK_HOME_REQUEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:carddav">
  <d:prop>
    <c:addressbook-home-set />
  </d:prop>
</d:propfind>"#;

const CALENDAR_COLLECTIONS_REQUEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
  <d:prop>
    <d:resourcetype />
    <d:displayname />
    <c:supported-calendar-component-set />
  </d:prop>
</d:propfind>"#;

const ADDRESSBOOK_COLLECTIONS_REQUEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:carddav">
  <d:prop>
    <d:resourcetype />
    <d:displayname />
  </d:prop>
</d:propfind>"#;

/// The two collection categories the walk can discover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A CalDAV calendar collection (RFC 4791).
    Calendar,
    /// A CardDAV address book collection (RFC 6352).
    AddressBook,
}

impl ResourceKind {
    /// PROPFIND body requesting the kind-specific home-set property.
    pub fn home_set_request_body(&self) -> &'static str {
        match self {
            Self::Calendar => CALENDAR_HOME_REQUEST,
            Self::AddressBook => ADDRESSBOOK_HOME_REQUEST,
        }
    }

    /// Local tag name of the home-set property in the server's response.
    pub fn home_set_local_name(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar-home-set",
            Self::AddressBook => "addressbook-home-set",
        }
    }

    /// PROPFIND body requesting the properties of collections under the home.
    pub fn collection_request_body(&self) -> &'static str {
        match self {
            Self::Calendar => CALENDAR_COLLECTIONS_REQUEST,
            Self::AddressBook => ADDRESSBOOK_COLLECTIONS_REQUEST,
        }
    }

    /// Classification filter: true when the multistatus `response` element
    /// describes a collection of this kind, i.e. its `resourcetype` has a
    /// `calendar` (resp. `addressbook`) child. Non-matching responses (such
    /// as the home collection itself) are dropped by the walker, not
    /// defaulted.
    pub fn matches(&self, response: &Element) -> bool {
        let marker = match self {
            Self::Calendar => "calendar",
            Self::AddressBook => "addressbook",
        };
        response
            .find_all("resourcetype")
            .first()
            .is_some_and(|rt| rt.has_child(marker))
    }

    /// Component names (`VEVENT`, `VTODO`, ...) the collection supports,
    /// taken from the `name` attribute of each child of
    /// `supported-calendar-component-set`, in document order.
    ///
    /// Always empty for address books, and empty (not an error) when a
    /// calendar server omits the property.
    pub fn supported_components(&self, response: &Element) -> Vec<String> {
        if *self != Self::Calendar {
            return Vec::new();
        }
        response
            .find_all("supported-calendar-component-set")
            .first()
            .map(|set| {
                set.children()
                    .iter()
                    .filter_map(|comp| comp.attribute("name"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Short lowercase label, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::AddressBook => "addressbook",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
