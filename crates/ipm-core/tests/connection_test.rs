#![allow(clippy::unwrap_used)]
// End-to-end reconcile tests for `ipm_network_connection` against a
// wiremock server.

use std::time::Instant;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipm_api::auth::server_root;
use ipm_api::{BearerToken, IpmClient, TransportConfig};
use ipm_core::model::NetworkConnection;
use ipm_core::{Attr, Provider, ProviderConfig, ReconcileSettings, Session};

const NC: &str = "ipm_network_connection";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Provider) {
    let server = MockServer::start().await;
    let root = server_root(&server.uri()).unwrap();
    let client =
        IpmClient::with_token(&root, &BearerToken::new("tok"), &TransportConfig::default())
            .unwrap();
    let provider = Provider::with_session(Session::new(client, ReconcileSettings::fast()));
    (server, provider)
}

fn plan_endpoint(module: &str) -> Value {
    plan_endpoint_on(module, "XR-T1")
}

fn plan_endpoint_on(module: &str, aid: &str) -> Value {
    json!({
        "selector": {
            "module_if_selector_by_module_name": {
                "module_name": module,
                "module_client_if_aid": aid
            }
        },
        "capacity": 100
    })
}

fn plan(name: &str) -> Value {
    json!({
        "config": {"name": name, "service_mode": "XR-L1"},
        "endpoints": [plan_endpoint("HubA"), plan_endpoint("LeafB")]
    })
}

fn prior(name: &str) -> Value {
    let mut prior = plan(name);
    prior["id"] = json!("nc-42");
    prior["endpoints"][0]["id"] = json!("ep-a");
    prior["endpoints"][1]["id"] = json!("ep-b");
    prior
}

fn server_endpoint(id: &str, module: &str) -> Value {
    server_endpoint_on(id, module, "XR-T1")
}

fn server_endpoint_on(id: &str, module: &str, aid: &str) -> Value {
    json!({
        "id": id,
        "href": format!("/api/v1/network-connections/nc-42/endpoints/{id}"),
        "parentId": "nc-42",
        "config": {
            "selector": {
                "moduleIfSelectorByModuleName": {"moduleName": module, "moduleClientIfAid": aid}
            },
            "capacity": 100
        },
        "state": {"capacity": 100, "lifecycleState": "configured"}
    })
}

/// The server lists endpoints in the reverse of declaration order and
/// reports fields the configuration never set.
fn server_connection(name: &str) -> Value {
    json!({
        "id": "nc-42",
        "href": "/api/v1/network-connections/nc-42",
        "config": {"name": name, "serviceMode": "XR-L1", "mc": "matchOnly"},
        "state": {"name": name, "serviceMode": "XR-L1", "lifecycleState": "configured"},
        "endpoints": [server_endpoint("ep-b", "LeafB"), server_endpoint("ep-a", "HubA")]
    })
}

async fn mount_connection(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_connection(name)))
        .mount(server)
        .await;
}

async fn mount_capacities(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/transport-capacities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn model(value: Value) -> NetworkConnection {
    serde_json::from_value(value).unwrap()
}

fn endpoint_ids(nc: &NetworkConnection) -> Vec<Option<&str>> {
    nc.endpoints.iter().map(|ep| ep.id.as_deref()).collect()
}

// ── Configure ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_refused_sign_in_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/realms/xr-cm/protocol/openid-connect/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let config = ProviderConfig::new(server.uri(), "admin", "wrong".to_owned());
    let err = Provider::configure(&config).await.err().unwrap();
    assert_eq!(err.kind(), "AuthError");
}

#[tokio::test]
async fn test_sign_in_then_read() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/realms/xr-cm/protocol/openid-connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_connection(&server, "nc1").await;

    let config = ProviderConfig::new(server.uri(), "admin", "pw".to_owned());
    let provider = Provider::configure(&config).await.unwrap();
    let state = provider.read(NC, prior("nc1")).await.unwrap().unwrap();
    assert_eq!(model(state).id, Attr::Known("nc-42".into()));
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_orders_endpoints_as_declared() {
    let (server, provider) = setup().await;

    mount_capacities(&server, json!([{"id": "tc-1", "state": {"lifecycleState": "configured"}}])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/network-connections"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!([
            {"href": "/api/v1/network-connections/nc-42"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_connection(&server, "nc1").await;

    let state = model(provider.create(NC, plan("nc1")).await.unwrap());

    assert_eq!(state.id, Attr::Known("nc-42".into()));
    assert_eq!(endpoint_ids(&state), vec![Some("ep-a"), Some("ep-b")]);
    assert_eq!(state.endpoints[0].capacity, Attr::Known(100));
    assert_eq!(state.config.name, Attr::Known("nc1".into()));
    // Reported by the server but never declared.
    assert_eq!(state.config.mc, Attr::Null);
    assert_eq!(state.config.labels, Attr::Null);

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body[0]["name"], json!("nc1"));
    assert_eq!(body[0]["serviceMode"], json!("XR-L1"));
    assert_eq!(body[0]["endpoints"].as_array().unwrap().len(), 2);
    assert!(body[0].get("mc").is_none());
}

#[tokio::test]
async fn test_create_waits_for_transport_capacity() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/transport-capacities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "tc-1", "state": {"lifecycleState": "pending"}}
        ])))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_capacities(&server, json!([{"id": "tc-1", "state": {"lifecycleState": "configured"}}])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/network-connections"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!([
            {"href": "/api/v1/network-connections/nc-42"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_connection(&server, "nc1").await;

    let state = model(provider.create(NC, plan("nc1")).await.unwrap());
    assert_eq!(state.id, Attr::Known("nc-42".into()));
}

#[tokio::test]
async fn test_create_without_capacity_never_posts() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/transport-capacities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(5)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider.create(NC, plan("nc1")).await.err().unwrap();
    assert_eq!(err.kind(), "PreconditionError");
}

#[tokio::test]
async fn test_capacity_without_lifecycle_state_is_not_ready() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/transport-capacities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "tc-1"}])))
        .expect(5)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider.create(NC, plan("nc1")).await.err().unwrap();
    assert_eq!(err.kind(), "PreconditionError");
}

#[tokio::test]
async fn test_create_waits_for_every_planned_interface() {
    let (server, provider) = setup().await;

    mount_capacities(&server, json!([{"id": "tc-1", "state": {"lifecycleState": "configured"}}])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/network-connections"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!([
            {"href": "/api/v1/network-connections/nc-42"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // LeafB/XR-T2 is not reported yet; ep-b is LeafB/XR-T1 and must not
    // stand in for it.
    let mut partial = server_connection("nc1");
    partial["endpoints"] = json!([
        server_endpoint("ep-a", "HubA"),
        server_endpoint("ep-b", "LeafB"),
        server_endpoint("ep-c", "LeafC"),
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(partial))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    let mut complete = server_connection("nc1");
    complete["endpoints"] = json!([
        server_endpoint_on("ep-b2", "LeafB", "XR-T2"),
        server_endpoint("ep-b", "LeafB"),
        server_endpoint("ep-a", "HubA"),
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(complete))
        .mount(&server)
        .await;

    let mut plan = plan("nc1");
    plan["endpoints"]
        .as_array_mut()
        .unwrap()
        .push(plan_endpoint_on("LeafB", "XR-T2"));

    let state = model(provider.create(NC, plan).await.unwrap());
    assert_eq!(endpoint_ids(&state), vec![Some("ep-a"), Some("ep-b"), Some("ep-b2")]);
}

#[tokio::test]
async fn test_create_with_one_endpoint_is_a_config_error() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let mut plan = plan("nc1");
    plan["endpoints"].as_array_mut().unwrap().pop();
    let err = provider.create(NC, plan).await.err().unwrap();
    assert_eq!(err.kind(), "ConfigError");
}

#[tokio::test]
async fn test_unreadable_create_reports_the_new_id() {
    let (server, provider) = setup().await;

    mount_capacities(&server, json!([{"id": "tc-1", "state": {"lifecycleState": "configured"}}])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/network-connections"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!([
            {"href": "/api/v1/network-connections/nc-42"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = provider.create(NC, plan("nc1")).await.err().unwrap();
    assert!(err.to_string().contains("nc-42"), "{err}");
}

// ── Read ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_keeps_undeclared_fields_null() {
    let (server, provider) = setup().await;
    mount_connection(&server, "nc1").await;

    let state = model(provider.read(NC, prior("nc1")).await.unwrap().unwrap());

    assert_eq!(state.config.outer_vid, Attr::Null);
    assert_eq!(state.config.mc, Attr::Null);
    assert_eq!(endpoint_ids(&state), vec![Some("ep-a"), Some("ep-b")]);
    let lifecycle = state
        .state
        .known()
        .and_then(|s| s.lifecycle_state.as_deref());
    assert_eq!(lifecycle, Some("configured"));
}

#[tokio::test]
async fn test_read_of_deleted_connection_is_none() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert_eq!(provider.read(NC, prior("nc1")).await.unwrap(), None);
}

#[tokio::test]
async fn test_read_without_id_looks_up_by_filter() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([server_connection("nc1")])))
        .expect(1)
        .mount(&server)
        .await;

    let state = model(provider.read(NC, plan("nc1")).await.unwrap().unwrap());
    assert_eq!(state.id, Attr::Known("nc-42".into()));
}

#[tokio::test]
async fn test_import_adopts_server_values() {
    let (server, provider) = setup().await;
    mount_connection(&server, "nc1").await;

    let state = model(provider.import(NC, "nc-42").await.unwrap());

    assert_eq!(state.config.name, Attr::Known("nc1".into()));
    assert_eq!(state.config.mc, Attr::Known("matchOnly".into()));
    // Nothing planned, so server order.
    assert_eq!(endpoint_ids(&state), vec![Some("ep-b"), Some("ep-a")]);
    let leaf = state.endpoints[0]
        .selector
        .module_if_selector_by_module_name
        .as_ref()
        .unwrap();
    assert_eq!(leaf.module.module_name, "LeafB");
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rename_puts_only_the_name() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/network-connections/nc-42"))
        .and(body_json(json!({"name": "nc2"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;
    mount_connection(&server, "nc2").await;

    let state = model(provider.update(NC, plan("nc2"), prior("nc1")).await.unwrap());
    assert_eq!(state.config.name, Attr::Known("nc2".into()));
}

#[tokio::test]
async fn test_added_endpoint_is_posted_to_the_connection() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/network-connections/nc-42/endpoints"))
        .and(body_json(json!([{
            "capacity": 100,
            "selector": {"moduleIfSelectorByModuleName": {"moduleName": "LeafC", "moduleClientIfAid": "XR-T1"}}
        }])))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!([
            {"href": "/api/v1/network-connections/nc-42/endpoints/ep-c"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut listed = server_connection("nc1");
    listed["endpoints"]
        .as_array_mut()
        .unwrap()
        .push(server_endpoint("ep-c", "LeafC"));
    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listed))
        .mount(&server)
        .await;

    let mut plan = plan("nc1");
    plan["endpoints"]
        .as_array_mut()
        .unwrap()
        .push(plan_endpoint("LeafC"));

    let state = model(provider.update(NC, plan, prior("nc1")).await.unwrap());
    assert_eq!(endpoint_ids(&state), vec![Some("ep-a"), Some("ep-b"), Some("ep-c")]);
}

#[tokio::test]
async fn test_capacity_change_puts_the_endpoint() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/network-connections/nc-42/endpoints/ep-b"))
        .and(body_json(json!({"capacity": 200})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    mount_connection(&server, "nc1").await;

    let mut plan = plan("nc1");
    plan["endpoints"][1]["capacity"] = json!(200);
    provider.update(NC, plan, prior("nc1")).await.unwrap();
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_waits_for_the_grace_period() {
    let (server, provider) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let started = Instant::now();
    provider.delete(NC, prior("nc1")).await.unwrap();
    assert!(started.elapsed() >= ReconcileSettings::fast().delete_grace);
}

#[tokio::test]
async fn test_delete_of_missing_connection_succeeds() {
    let (server, provider) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    provider.delete(NC, prior("nc1")).await.unwrap();
}
