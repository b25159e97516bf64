//! Typed tag mapping with explicit presence checks

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const HIGHWAY: &str = "highway";
pub const BICYCLE: &str = "bicycle";

/// Every tag slot that can describe a cycleway on a street
pub const CYCLEWAY_KEYS: [&str; 4] = [
    "cycleway",
    "cycleway:left",
    "cycleway:right",
    "cycleway:both",
];

/// String tags attached to a street feature.
///
/// Missing keys are simply absent, lookups never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True if `key` is present and its value is one of `values`
    pub fn is_one_of(&self, key: &str, values: &[&str]) -> bool {
        self.get(key).is_some_and(|value| values.contains(&value))
    }

    /// True if any of `keys` carries one of `values`
    pub fn any_is_one_of(&self, keys: &[&str], values: &[&str]) -> bool {
        keys.iter().any(|key| self.is_one_of(key, values))
    }

    pub fn highway(&self) -> Option<&str> {
        self.get(HIGHWAY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
