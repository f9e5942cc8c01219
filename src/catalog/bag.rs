//! Ordered attribute bags.
//!
//! Catalog elements carry open attribute sets whose order must survive a
//! load/save round trip, so the bag keeps insertion order instead of hashing.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    entries: Vec<(String, String)>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Set `key`, keeping its current position when it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field-by-field merge where `other` wins on every shared key.
    pub fn merge(&self, other: &AttributeBag) -> AttributeBag {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            merged.set(key, value);
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = AttributeBag::new();
        for (key, value) in iter {
            bag.set(key, value);
        }
        bag
    }
}

impl Serialize for AttributeBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct BagVisitor;

impl<'de> Visitor<'de> for BagVisitor {
    type Value = AttributeBag;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of string attributes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut bag = AttributeBag::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            bag.set(key, value);
        }
        Ok(bag)
    }
}

impl<'de> Deserialize<'de> for AttributeBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BagVisitor)
    }
}
