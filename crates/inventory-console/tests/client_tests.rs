//! Integration tests for the HTTP inventory client
//!
//! Each test starts a wiremock server standing in for the inventory service.

use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

use inventory_console::config::ServerConfig;
use inventory_console::error::{ConsoleError, TRANSPORT_FAILURE_CODE};
use inventory_console::{HttpInventoryClient, InventoryApi};

const BASE: &str = "/hawkular/inventory";

// =============================================================================
// Test Fixtures
// =============================================================================

async fn client_for(server: &MockServer) -> HttpInventoryClient {
    let config = ServerConfig::from_url(&format!("{}{}", server.uri(), BASE)).unwrap();
    HttpInventoryClient::new(&config).unwrap()
}

fn resource_json(id: &str, name: &str, type_id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "type": {"id": type_id, "operations": []},
        "feedId": "feed1",
        "metrics": []
    })
}

fn result_set(results: Vec<serde_json::Value>) -> serde_json::Value {
    let size = results.len();
    json!({"results": results, "resultSize": size, "startOffset": 0})
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn test_root_query_uses_root_parameter() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/resources")))
        .and(matchers::query_param("root", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_set(vec![
            resource_json("s1", "alpha", "Server"),
            resource_json("d1", "zeta", "Domain"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let roots = client.root_resources().await.unwrap();

    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].id, "s1");
    assert_eq!(roots[0].feed_id.as_deref(), Some("feed1"));
}

#[tokio::test]
async fn test_children_path_is_encoded() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/resources/feed1%2Fserver%20a/children")))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_set(vec![
            resource_json("ds1", "ExampleDS", "Datasource"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let children = client.children("feed1/server a").await.unwrap();

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].type_id(), "Datasource");
}

#[tokio::test]
async fn test_unknown_fields_are_kept() {
    let server = MockServer::start().await;
    let mut body = resource_json("s1", "alpha", "Server");
    body["vendorField"] = json!({"nested": true});
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/resources/s1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let resource = client.resource("s1").await.unwrap();

    assert_eq!(resource.extra.get("vendorField"), Some(&json!({"nested": true})));
    assert!(resource.to_pretty_json().contains("vendorField"));
}

#[tokio::test]
async fn test_types_query() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/types")))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_set(vec![
            json!({"id": "Server", "operations": [{"name": "Reload"}], "properties": {"a": "1"}}),
            json!({"id": "Datasource", "operations": []}),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let types = client.resource_types().await.unwrap();

    assert_eq!(types.len(), 2);
    assert_eq!(types[0].operations[0].name, "Reload");
    assert_eq!(types[0].metadata_len(), 1);
}

#[tokio::test]
async fn test_status_document() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "UP"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client.status().await.unwrap();
    assert_eq!(status.get("status"), Some(&json!("UP")));
}

// =============================================================================
// Deletes
// =============================================================================

#[tokio::test]
async fn test_delete_resource_targets_given_resource() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("DELETE"))
        .and(matchers::path(format!("{BASE}/resources/feed1%2Fs1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.delete_resource("feed1/s1").await.unwrap();
}

#[tokio::test]
async fn test_delete_type_is_encoded() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("DELETE"))
        .and(matchers::path(format!("{BASE}/types/WildFly%20Server")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.delete_resource_type("WildFly Server").await.unwrap();
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_server_error_becomes_status() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/types")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.resource_types().await.unwrap_err();

    assert_eq!(err.transport_code(), 500);
    assert_eq!(err.to_string(), "Status [500] Internal Server Error");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/resources")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.root_resources().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ServerConfig {
        port,
        timeout_secs: 2,
        ..ServerConfig::default()
    };
    let client = HttpInventoryClient::new(&config).unwrap();
    let err = client.root_resources().await.unwrap_err();

    assert!(matches!(err, ConsoleError::Transport(_)));
    assert_eq!(err.transport_code(), TRANSPORT_FAILURE_CODE);
}
