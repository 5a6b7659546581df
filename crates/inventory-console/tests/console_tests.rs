//! End-to-end tests for the console views against a mocked inventory service

use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

use inventory_console::config::ServerConfig;
use inventory_console::notify::{NOT_RESPONDING_MESSAGE, RecordingNotifier};
use inventory_console::tree::{NO_SELECTION_TEXT, NodePath};
use inventory_console::{HttpInventoryClient, ResourceTree, TypeCatalog};

const BASE: &str = "/hawkular/inventory";

fn client_for(server: &MockServer) -> HttpInventoryClient {
    let config = ServerConfig::from_url(&format!("{}{}", server.uri(), BASE)).unwrap();
    HttpInventoryClient::new(&config).unwrap()
}

fn resource(id: &str, name: &str, type_id: &str) -> serde_json::Value {
    json!({"id": id, "name": name, "type": {"id": type_id}})
}

async fn mount_roots(server: &MockServer, roots: Vec<serde_json::Value>) {
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/resources")))
        .and(matchers::query_param("root", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": roots})))
        .mount(server)
        .await;
}

// =============================================================================
// Resource Tree
// =============================================================================

#[tokio::test]
async fn test_tree_roots_sorted_by_type_then_name() {
    let server = MockServer::start().await;
    mount_roots(
        &server,
        vec![
            resource("s2", "beta", "Server"),
            resource("s1", "alpha", "Server"),
            resource("a1", "zeta", "Agent"),
        ],
    )
    .await;

    let client = client_for(&server);
    let notifier = RecordingNotifier::new();
    let mut tree = ResourceTree::new();

    let roots = tree.load_roots(&client, &notifier).await.unwrap();
    let texts: Vec<_> = roots.iter().map(|n| n.text.clone()).collect();
    assert_eq!(texts, vec!["[Agent] zeta", "[Server] alpha", "[Server] beta"]);
    assert_eq!(tree.detail().json, NO_SELECTION_TEXT);
}

#[tokio::test]
async fn test_tree_expansion_fetches_once() {
    let server = MockServer::start().await;
    mount_roots(&server, vec![resource("feed1/s1", "alpha", "Server")]).await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/resources/feed1%2Fs1/children")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [resource("ds2", "B", "Datasource"), resource("ds1", "A", "Datasource")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let notifier = RecordingNotifier::new();
    let mut tree = ResourceTree::new();
    tree.load_roots(&client, &notifier).await.unwrap();

    let path = NodePath::root(0);
    let children = tree.expand_node(&path, &client, &notifier).await.unwrap();
    assert_eq!(children[0].text, "[Datasource] A");

    tree.collapse(&path);
    let again = tree.expand_node(&path, &client, &notifier).await.unwrap();
    assert_eq!(again.len(), 2);
    assert_eq!(tree.visible_rows().len(), 3);
}

#[tokio::test]
async fn test_tree_delete_uses_selected_resource_id() {
    let server = MockServer::start().await;
    mount_roots(&server, vec![resource("feed/1", "alpha", "Server")]).await;
    Mock::given(matchers::method("DELETE"))
        .and(matchers::path(format!("{BASE}/resources/feed%2F1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let notifier = RecordingNotifier::new();
    let mut tree = ResourceTree::new();
    tree.load_roots(&client, &notifier).await.unwrap();

    let detail = tree.select_node(&NodePath::root(0)).unwrap();
    let selected = detail.resource.clone().unwrap();
    tree.delete_resource(&selected, &client, &notifier)
        .await
        .unwrap();
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_tree_server_error_notifies_status() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/resources")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let notifier = RecordingNotifier::new();
    let mut tree = ResourceTree::new();

    assert!(tree.load_roots(&client, &notifier).await.is_err());
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].ends_with("Status [503] Service Unavailable"));
}

#[tokio::test]
async fn test_tree_unreachable_service_notifies_not_responding() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = HttpInventoryClient::new(&ServerConfig {
        port,
        timeout_secs: 2,
        ..ServerConfig::default()
    })
    .unwrap();
    let notifier = RecordingNotifier::new();
    let mut tree = ResourceTree::new();

    assert!(tree.load_roots(&client, &notifier).await.is_err());
    assert!(tree.tree().is_none());
    assert!(notifier.messages()[0].ends_with(NOT_RESPONDING_MESSAGE));
}

// =============================================================================
// Type Catalog
// =============================================================================

#[tokio::test]
async fn test_types_delete_refreshes_list() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/types")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "Server"}, {"id": "Datasource"}]
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(matchers::method("DELETE"))
        .and(matchers::path(format!("{BASE}/types/Datasource")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{BASE}/types")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": "Server"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let notifier = RecordingNotifier::new();
    let mut catalog = TypeCatalog::new();

    let types = catalog.load_types(&client, &notifier).await.unwrap();
    let ids: Vec<_> = types.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec!["Datasource", "Server"]);

    let remaining = catalog
        .delete_type("Datasource", &client, &notifier)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(catalog.filtered().len(), 1);
}
