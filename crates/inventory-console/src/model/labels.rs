//! Insertion-ordered metric labels
//!
//! Label selectors are rendered in the order the service sent them, so the
//! labels cannot live in a sorted or hashed map.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Label name to label value mapping that remembers insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(Vec<(String, String)>);

impl Labels {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a label. Re-inserting an existing name replaces its value but
    /// keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut labels = Labels::new();
        for (k, v) in iter {
            labels.insert(k, v);
        }
        labels
    }
}

impl Serialize for Labels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct LabelsVisitor;

impl<'de> Visitor<'de> for LabelsVisitor {
    type Value = Labels;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of label names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Labels, A::Error> {
        let mut labels = Labels(Vec::with_capacity(access.size_hint().unwrap_or(0)));
        while let Some((name, value)) = access.next_entry::<String, String>()? {
            labels.insert(name, value);
        }
        Ok(labels)
    }
}

impl<'de> Deserialize<'de> for Labels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LabelsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_keeps_wire_order() {
        let labels: Labels =
            serde_json::from_str(r#"{"pod":"a","namespace":"prod","app":"web"}"#).unwrap();
        let names: Vec<_> = labels.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["pod", "namespace", "app"]);
        assert_eq!(labels.get("namespace"), Some("prod"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut labels: Labels = [("a", "1"), ("b", "2")].into_iter().collect();
        labels.insert("a", "3");
        let entries: Vec<_> = labels.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_serialize_in_order() {
        let labels: Labels = [("z", "1"), ("a", "2")].into_iter().collect();
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn test_non_string_value_rejected() {
        let result: Result<Labels, _> = serde_json::from_str(r#"{"pod":1}"#);
        assert!(result.is_err());
    }
}
