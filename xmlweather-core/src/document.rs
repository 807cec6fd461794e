//! Immutable parsed form of the weather feed.

use tracing::debug;
use xmltree::{Element, XMLNode};

use crate::{
    error::{Result, WeatherError},
    model::ConditionSet,
};

/// Attribute every feed field stores its value in.
pub const DATA_ATTR: &str = "data";

/// Parsed XML tree of one fetched feed. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct WeatherDocument {
    root: Element,
}

impl WeatherDocument {
    /// Parse a response body. Malformed XML is a [`WeatherError::Parse`].
    pub fn parse(xml: &str) -> Result<Self> {
        let root = Element::parse(xml.as_bytes())?;
        debug!(root = %root.name, "parsed weather document");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every element named `name`, depth-first in document order. The root
    /// itself is included when it matches.
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        find_all_in(&self.root, name)
    }

    /// First element named `name` in document order.
    pub fn find(&self, name: &str) -> Option<&Element> {
        find_in(&self.root, name)
    }

    /// Like [`find`](Self::find), but absence is a [`WeatherError::NotFound`].
    pub fn require(&self, name: &str) -> Result<&Element> {
        require_in(&self.root, name)
    }
}

/// First element named `name` in the subtree rooted at `scope`, `scope` included.
pub fn find_in<'a>(scope: &'a Element, name: &str) -> Option<&'a Element> {
    if scope.name == name {
        return Some(scope);
    }

    child_elements(scope).find_map(|child| find_in(child, name))
}

/// Every element named `name` under `scope`, depth-first in document order.
pub fn find_all_in<'a>(scope: &'a Element, name: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_named(scope, name, &mut found);
    found
}

pub fn require_in<'a>(scope: &'a Element, name: &str) -> Result<&'a Element> {
    find_in(scope, name).ok_or_else(|| WeatherError::NotFound(format!("<{name}> element")))
}

fn collect_named<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    if element.name == name {
        found.push(element);
    }

    for child in child_elements(element) {
        collect_named(child, name, found);
    }
}

/// Immediate child elements, skipping text, comments and the like.
pub fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

/// `data` attribute of an element, or `NotFound` naming `<parent>/<child>@data`.
pub fn data_of<'a>(parent: &Element, child: &'a Element) -> Result<&'a str> {
    child
        .attributes
        .get(DATA_ATTR)
        .map(String::as_str)
        .ok_or_else(|| {
            WeatherError::NotFound(format!("{}/{}@{DATA_ATTR}", parent.name, child.name))
        })
}

/// Tag name to `data` value for every immediate child element.
pub fn fields_of(element: &Element) -> Result<ConditionSet> {
    let mut fields = ConditionSet::new();

    for child in child_elements(element) {
        fields.insert(child.name.clone(), data_of(element, child)?);
    }

    Ok(fields)
}
