//! Inventory data model
//!
//! Mirrors the JSON documents served by the inventory service. Fields the
//! console does not interpret are kept in `extra` so the detail views can
//! show the full payload.

pub mod labels;

pub use labels::Labels;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Envelope for list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet<T> {
    pub results: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<u64>,
}

/// Reference from a resource to its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TypeRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }
}

/// A managed inventory entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Identifiers of the direct children, in server order
    #[serde(default, rename = "childrenIds", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_type: TypeRef::new(type_id),
            feed_id: None,
            parent_id: None,
            children: Vec::new(),
            metrics: Vec::new(),
            properties: BTreeMap::new(),
            config: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn type_id(&self) -> &str {
        &self.resource_type.id
    }

    /// Tree label: `[type] name`
    pub fn label(&self) -> String {
        format!("[{}] {}", self.resource_type.id, self.name)
    }

    /// Pretty-printed JSON of the full resource
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unprintable: {e}>"))
    }
}

/// Display order of resources: type identifier, then name, both compared
/// byte-wise (case-sensitive).
pub fn compare_resources(a: &Resource, b: &Resource) -> Ordering {
    a.resource_type
        .id
        .cmp(&b.resource_type.id)
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort resources into display order
pub fn sort_resources(resources: &mut [Resource]) {
    resources.sort_by(compare_resources);
}

/// A measurable attached to a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[serde(default)]
    pub display_name: String,
    /// Metric family name in the metrics backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Label selector identifying the series within the family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metric {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            family: None,
            unit: None,
            labels: None,
            properties: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = Some(labels);
        self
    }
}

/// Sort metrics by display name ascending
pub fn sort_metrics(metrics: &mut [Metric]) {
    metrics.sort_by(|a, b| a.display_name.cmp(&b.display_name));
}

/// An operation a resource type supports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

/// A category of resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operations: Vec::new(),
            properties: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Number of metadata entries shown next to the type in list views
    pub fn metadata_len(&self) -> usize {
        self.properties.len()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unprintable: {e}>"))
    }
}
