//! Test utilities for the inventory console - in-memory service mock
//!
//! [`MockInventory`] answers [`InventoryApi`] calls from canned data and
//! records every call, so view-state tests run without an HTTP server.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::client::InventoryApi;
use crate::error::{ConsoleError, Result};
use crate::model::{Resource, ResourceType};

#[derive(Debug, Clone)]
enum Failure {
    Transport,
    Status(u16, String),
}

#[derive(Debug, Default)]
struct MockData {
    roots: Vec<Resource>,
    children: HashMap<String, Vec<Resource>>,
    types: Vec<ResourceType>,
    failure: Option<Failure>,
    calls: Vec<String>,
}

/// In-memory inventory service
#[derive(Debug, Default)]
pub struct MockInventory {
    data: Mutex<MockData>,
}

impl MockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_roots(self, roots: Vec<Resource>) -> Self {
        self.data().roots = roots;
        self
    }

    pub fn with_children(self, parent_id: &str, children: Vec<Resource>) -> Self {
        self.data().children.insert(parent_id.to_string(), children);
        self
    }

    pub fn with_types(self, types: Vec<ResourceType>) -> Self {
        self.data().types = types;
        self
    }

    /// Every call fails as if the service were unreachable
    pub fn failing_transport(self) -> Self {
        self.data().failure = Some(Failure::Transport);
        self
    }

    /// Every following call fails with the given HTTP status
    pub fn fail_with_status(&self, code: u16, text: &str) {
        self.data().failure = Some(Failure::Status(code, text.to_string()));
    }

    pub fn clear_failure(&self) {
        self.data().failure = None;
    }

    pub fn set_types(&self, types: Vec<ResourceType>) {
        self.data().types = types;
    }

    /// Calls received so far, e.g. `GET children feed1`
    pub fn calls(&self) -> Vec<String> {
        self.data().calls.clone()
    }

    /// Number of calls whose description contains `fragment`
    pub fn call_count(&self, fragment: &str) -> usize {
        self.data()
            .calls
            .iter()
            .filter(|c| c.contains(fragment))
            .count()
    }

    fn record(&self, call: String) -> Result<MutexGuard<'_, MockData>> {
        let mut data = self.data();
        data.calls.push(call);
        match data.failure.clone() {
            None => Ok(data),
            Some(Failure::Transport) => {
                Err(ConsoleError::Transport("connection refused".to_string()))
            }
            Some(Failure::Status(code, text)) => Err(ConsoleError::Status { code, text }),
        }
    }
}

#[async_trait]
impl InventoryApi for MockInventory {
    async fn root_resources(&self) -> Result<Vec<Resource>> {
        let data = self.record("GET roots".to_string())?;
        Ok(data.roots.clone())
    }

    async fn children(&self, resource_id: &str) -> Result<Vec<Resource>> {
        let data = self.record(format!("GET children {resource_id}"))?;
        Ok(data.children.get(resource_id).cloned().unwrap_or_default())
    }

    async fn resource(&self, resource_id: &str) -> Result<Resource> {
        let data = self.record(format!("GET resource {resource_id}"))?;
        data.roots
            .iter()
            .chain(data.children.values().flatten())
            .find(|r| r.id == resource_id)
            .cloned()
            .ok_or_else(|| ConsoleError::Status {
                code: 404,
                text: "Not Found".to_string(),
            })
    }

    async fn delete_resource(&self, resource_id: &str) -> Result<()> {
        let mut data = self.record(format!("DELETE resource {resource_id}"))?;
        data.roots.retain(|r| r.id != resource_id);
        Ok(())
    }

    async fn resource_types(&self) -> Result<Vec<ResourceType>> {
        let data = self.record("GET types".to_string())?;
        Ok(data.types.clone())
    }

    async fn delete_resource_type(&self, type_id: &str) -> Result<()> {
        let mut data = self.record(format!("DELETE type {type_id}"))?;
        data.types.retain(|t| t.id != type_id);
        Ok(())
    }

    async fn status(&self) -> Result<Map<String, Value>> {
        self.record("GET status".to_string())?;
        let mut status = Map::new();
        status.insert("status".to_string(), Value::from("UP"));
        Ok(status)
    }
}
