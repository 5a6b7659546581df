//! Inventory service REST bindings
//!
//! [`InventoryApi`] is the seam the view state talks to; [`HttpInventoryClient`]
//! is the reqwest implementation.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::encoding::encode_component;
use crate::error::{ConsoleError, Result};
use crate::model::{Resource, ResourceType, ResultSet};

/// Operations the console needs from the inventory service
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Resources without a parent
    async fn root_resources(&self) -> Result<Vec<Resource>>;

    /// Direct children of the resource with the given (raw) identifier
    async fn children(&self, resource_id: &str) -> Result<Vec<Resource>>;

    /// A single resource by (raw) identifier
    async fn resource(&self, resource_id: &str) -> Result<Resource>;

    /// Delete the resource with the given (raw) identifier
    async fn delete_resource(&self, resource_id: &str) -> Result<()>;

    /// All resource types
    async fn resource_types(&self) -> Result<Vec<ResourceType>>;

    /// Delete the resource type with the given (raw) identifier
    async fn delete_resource_type(&self, type_id: &str) -> Result<()>;

    /// Service status document (e.g. `{"status": "UP"}`)
    async fn status(&self) -> Result<Map<String, Value>>;
}

/// HTTP client for the inventory REST API
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// Create a client for the configured server
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConsoleError::Config(format!("Failed to build HTTP client: {e}")))?;

        let base_url = config.base_url();
        info!("Inventory client initialized for {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn resource_url(&self, resource_id: &str) -> String {
        self.url(&format!("/resources/{}", encode_component(resource_id)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let response = check_status(response)?;
        response
            .json::<T>()
            .await
            .map_err(|e| ConsoleError::Decode(e.to_string()))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        check_status(response)?;
        Ok(())
    }
}

/// Turn a non-success response into [`ConsoleError::Status`]
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ConsoleError::Status {
            code: status.as_u16(),
            text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        })
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    async fn root_resources(&self) -> Result<Vec<Resource>> {
        let url = self.url("/resources?root=true");
        let set: ResultSet<Resource> = self.get_json(&url).await?;
        Ok(set.results)
    }

    async fn children(&self, resource_id: &str) -> Result<Vec<Resource>> {
        let url = format!("{}/children", self.resource_url(resource_id));
        let set: ResultSet<Resource> = self.get_json(&url).await?;
        Ok(set.results)
    }

    async fn resource(&self, resource_id: &str) -> Result<Resource> {
        let url = self.resource_url(resource_id);
        self.get_json(&url).await
    }

    async fn delete_resource(&self, resource_id: &str) -> Result<()> {
        let url = self.resource_url(resource_id);
        self.delete(&url).await
    }

    async fn resource_types(&self) -> Result<Vec<ResourceType>> {
        let url = self.url("/types");
        let set: ResultSet<ResourceType> = self.get_json(&url).await?;
        Ok(set.results)
    }

    async fn delete_resource_type(&self, type_id: &str) -> Result<()> {
        let url = self.url(&format!("/types/{}", encode_component(type_id)));
        self.delete(&url).await
    }

    async fn status(&self) -> Result<Map<String, Value>> {
        let url = self.url("/status");
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_is_encoded() {
        let client = HttpInventoryClient::new(&ServerConfig::default()).expect("client");
        assert_eq!(
            client.resource_url("feed/1 a"),
            "http://127.0.0.1:8080/hawkular/inventory/resources/feed%2F1%20a"
        );
    }

    #[test]
    fn test_base_url_from_config() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8003,
            ..ServerConfig::default()
        };
        let client = HttpInventoryClient::new(&config).expect("client");
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/hawkular/inventory");
    }
}
