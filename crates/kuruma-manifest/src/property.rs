//! Property maps produced by interpreting a manifest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The value of one manifest declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// `key "value"`
    Scalar(String),

    /// `key { "a", "b" }`
    List(Vec<String>),
}

impl PropertyValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            PropertyValue::Scalar(s) => Some(s),
            PropertyValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::Scalar(_) => None,
            PropertyValue::List(items) => Some(items),
        }
    }

    /// Every string in the value, whichever shape it has.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            PropertyValue::Scalar(s) => std::slice::from_ref(s),
            PropertyValue::List(items) => items,
        };
        items.iter().map(String::as_str)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Scalar(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(items: Vec<String>) -> Self {
        PropertyValue::List(items)
    }
}

/// Declaration name → value. A later declaration of the same key replaces
/// the earlier one, whatever shape either had.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap {
    entries: BTreeMap<String, PropertyValue>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, returning the value it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    /// The value of `key` if it was declared in scalar shape.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_scalar)
    }

    /// The value of `key` if it was declared in list shape.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(PropertyValue::as_list)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
