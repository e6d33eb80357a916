#![allow(clippy::unwrap_used)]
// Integration tests for `IpmClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipm_api::auth::server_root;
use ipm_api::selector::{ByName, ModuleSelector};
use ipm_api::types::{ConnectionConfig, EndpointUpdate, ModuleCreate, ModuleSettings};
use ipm_api::{BearerToken, Error, IpmClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, IpmClient) {
    let server = MockServer::start().await;
    let root = server_root(&server.uri()).unwrap();
    let client =
        IpmClient::with_token(&root, &BearerToken::new("tok"), &TransportConfig::default())
            .unwrap();
    (server, client)
}

// ── Request conventions ─────────────────────────────────────────────

#[tokio::test]
async fn test_requests_carry_token_and_json_content_type() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections/nc-42"))
        .and(query_param("content", "expanded"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "nc-42",
            "config": {"name": "nc1", "serviceMode": "XR-L1"},
            "endpoints": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let nc = client.get_connection("nc-42").await.unwrap();
    assert_eq!(nc.id.as_deref(), Some("nc-42"));
    assert_eq!(nc.config.unwrap().service_mode.as_deref(), Some("XR-L1"));
}

#[tokio::test]
async fn test_create_posts_array_of_one_and_reads_id_from_href() {
    let (server, client) = setup().await;

    let body = ModuleCreate {
        selector: ModuleSelector::ModuleName(ByName {
            module_name: "LeafB".into(),
        }),
        module: ModuleSettings::default(),
        managed_by: None,
    };

    Mock::given(method("POST"))
        .and(path("/api/v1/xr-networks/nw-1/leafModules"))
        .and(body_json(json!([{"selector": {"moduleSelectorByModuleName": {"moduleName": "LeafB"}}}])))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!([
            {"href": "/api/v1/xr-networks/nw-1/leafModules/lm-7"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let id = client.create_leaf_module("nw-1", &body).await.unwrap();
    assert_eq!(id, "lm-7");
}

#[tokio::test]
async fn test_partial_put_body_has_only_set_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/network-connections/nc-42"))
        .and(body_json(json!({"name": "nc2"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let body = ConnectionConfig {
        name: Some("nc2".into()),
        ..ConnectionConfig::default()
    };
    client.update_connection("nc-42", &body).await.unwrap();
}

#[tokio::test]
async fn test_endpoint_capacity_put() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/network-connections/nc-42/endpoints/ep-1"))
        .and(body_json(json!({"capacity": 200})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_endpoint("nc-42", "ep-1", &EndpointUpdate { capacity: 200 })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_filter_is_sent_as_q_parameter() {
    let (server, client) = setup().await;
    let filter = r#"{"config.name":{"$in":["net1"]}}"#;

    Mock::given(method("GET"))
        .and(path("/api/v1/xr-networks"))
        .and(query_param("content", "expanded"))
        .and(query_param("q", filter))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "nw-1", "config": {"name": "net1", "constellationFrequency": 193000000}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let networks = client.list_networks(Some(filter)).await.unwrap();
    assert_eq!(networks.len(), 1);
    assert_eq!(
        networks[0].config.as_ref().unwrap().constellation_frequency,
        Some(193_000_000)
    );
}

#[tokio::test]
async fn test_slash_in_id_stays_inside_its_segment() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/xr-networks/..%2Fxr-networks%2Fnw-1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/xr-networks/nw-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "nw-1"})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.get_network("../xr-networks/nw-1").await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn test_dot_segment_ids_are_refused_before_sending() {
    let (server, client) = setup().await;

    let err = client.delete_leaf_module("nw-1", "..").await.unwrap_err();
    assert!(matches!(err, Error::InvalidId(ref id) if id == ".."), "{err}");
    let err = client.get_connection("").await.unwrap_err();
    assert!(matches!(err, Error::InvalidId(_)), "{err}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/network-connections/nc-42"))
        .respond_with(ResponseTemplate::new(409).set_body_string("busy"))
        .mount(&server)
        .await;

    let err = client.delete_connection("nc-42").await.unwrap_err();
    match err {
        Error::Http { status, body } => {
            assert_eq!(status, 409);
            assert_eq!(body, "busy");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_no_content_is_not_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/acs/ac-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = client.get_ac("ac-1").await.unwrap_err();
    assert_eq!(err.status(), Some(204));
}

#[tokio::test]
async fn test_unparseable_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/lcs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_lcs().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
