//! Navigable representation of decoded JSON responses.
//!
//! Every JSON body that comes back from the API is converted into an
//! [`Element`] tree. Objects become `Element::Object` recursively, with no
//! plain map type anywhere in parsed output, so callers can walk arbitrary
//! response shapes (`issue["assignee"]["login"]`) without declaring a
//! struct per endpoint.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// A decoded JSON value.
///
/// Mirrors the JSON data model; built from [`serde_json::Value`] via
/// [`parse_element`] and serializes back to the exact JSON it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Element>),
    Object(BTreeMap<String, Element>),
}

/// Shared instance returned by `Index` lookups that miss.
static NULL: Element = Element::Null;

/// Convert a decoded JSON tree into an [`Element`] tree.
///
/// Total over any JSON value: objects and arrays are converted
/// recursively, scalars pass through unchanged.
pub fn parse_element(value: serde_json::Value) -> Element {
    match value {
        serde_json::Value::Null => Element::Null,
        serde_json::Value::Bool(b) => Element::Bool(b),
        serde_json::Value::Number(n) => Element::Number(n),
        serde_json::Value::String(s) => Element::String(s),
        serde_json::Value::Array(items) => {
            Element::Array(items.into_iter().map(parse_element).collect())
        }
        serde_json::Value::Object(map) => Element::Object(
            map.into_iter()
                .map(|(key, val)| (key, parse_element(val)))
                .collect(),
        ),
    }
}

impl Element {
    /// Create an empty object, the shape of a bodyless response.
    pub fn empty() -> Self {
        Element::Object(BTreeMap::new())
    }

    /// Look up a key on an object. Returns `None` for absent keys and for
    /// non-object elements.
    pub fn get(&self, key: &str) -> Option<&Element> {
        match self {
            Element::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Element::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Element::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Element::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Element::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Element]> {
        match self {
            Element::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Element>> {
        match self {
            Element::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Element {
    fn from(value: serde_json::Value) -> Self {
        parse_element(value)
    }
}

impl Index<&str> for Element {
    type Output = Element;

    fn index(&self, key: &str) -> &Element {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Element {
    type Output = Element;

    fn index(&self, index: usize) -> &Element {
        match self {
            Element::Array(items) => items.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl fmt::Display for Element {
    /// Renders the element as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

// =============================================================================
// Tests
// =============================================================================
