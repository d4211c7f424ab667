//! Namespace-agnostic multistatus parsing.
//!
//! WebDAV servers are free to pick arbitrary prefixes (`d:`, `D:`, `lp1:`,
//! ...) for the standard namespaces, so element matching is always on the
//! local part of a tag name, never the qualified name.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{DiscoveryError, DiscoveryResult};

/// A parsed XML element, reduced to what the discovery walk needs: local
/// names, attributes, children and text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: HashMap<String, String>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// The tag name with any namespace prefix removed.
    pub fn local_name(&self) -> &str {
        &self.name
    }

    /// Accumulated text content of this element (not its descendants).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Looks up an attribute by its local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Direct children, in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == local)
    }

    /// True if a direct child with the given local name exists.
    pub fn has_child(&self, local: &str) -> bool {
        self.child(local).is_some()
    }

    /// All elements in this subtree (including self) with the given local
    /// name, eagerly collected in document order.
    pub fn find_all<'a>(&'a self, local: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_into(local, &mut out);
        out
    }

    fn collect_into<'a>(&'a self, local: &str, out: &mut Vec<&'a Element>) {
        if self.name == local {
            out.push(self);
        }
        for child in &self.children {
            child.collect_into(local, out);
        }
    }

    /// Depth-first search for the first descendant with the given local name
    /// that carries non-empty text. Used to pull an `href` value out of a
    /// property regardless of nesting depth.
    pub fn first_text_descendant(&self, local: &str) -> Option<&str> {
        for child in &self.children {
            if child.name == local && !child.text.is_empty() {
                return Some(child.text.as_str());
            }
            if let Some(found) = child.first_text_descendant(local) {
                return Some(found);
            }
        }
        None
    }
}

/// Parses a PROPFIND response body into an element tree.
///
/// Malformed XML is an error; the walk never treats a broken body as an
/// empty result.
pub fn parse(body: &str) -> DiscoveryResult<Element> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| DiscoveryError::Xml(e.to_string()))?
        {
            Event::Start(e) => {
                stack.push(element_from_start(&e)?);
            }
            Event::Empty(e) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DiscoveryError::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                if let Some(parent) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| DiscoveryError::Xml(e.to_string()))?;
                    parent.text.push_str(&text);
                }
            }
            Event::CData(t) => {
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(DiscoveryError::Xml("unterminated element".to_string()));
    }
    root.ok_or_else(|| DiscoveryError::Xml("empty document".to_string()))
}

fn element_from_start(start: &BytesStart<'_>) -> DiscoveryResult<Element> {
    let name = String::from_utf8_lossy(start.name().local_name().as_ref()).into_owned();
    let mut attributes = HashMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DiscoveryError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DiscoveryError::Xml(e.to_string()))?
            .into_owned();
        attributes.insert(key, value);
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> DiscoveryResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                return Err(DiscoveryError::Xml(
                    "multiple root elements".to_string(),
                ));
            }
            *root = Some(element);
        }
    }
    Ok(())
}
