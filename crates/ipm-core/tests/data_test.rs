#![allow(clippy::unwrap_used)]
// Data source reads against a wiremock server.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipm_api::auth::server_root;
use ipm_api::{BearerToken, IpmClient, TransportConfig};
use ipm_core::data::{AcsData, FoundNetworksData, NcEndpointsData, NetworkConnectionsData};
use ipm_core::{Attr, Provider, ReconcileSettings, Session};

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

// ── Networks ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_found_networks_filters_by_name() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/xr-networks"))
        .and(query_param("q", r#"{"config.name":{"$in":["net1"]}}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "nw-1", "config": {"name": "net1", "topology": "hub-spoke"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let out = provider
        .read_data("ipm_found_networks", json!({"names": ["net1"]}))
        .await
        .unwrap();
    let data: FoundNetworksData = serde_json::from_value(out).unwrap();

    assert_eq!(data.names, vec!["net1".to_owned()]);
    assert_eq!(data.networks.len(), 1);
    assert_eq!(data.networks[0].id, Attr::Known("nw-1".into()));
    assert_eq!(data.networks[0].config.topology, Attr::Known("hub-spoke".into()));
}

#[tokio::test]
async fn test_found_networks_needs_names() {
    let (_server, provider) = setup().await;
    let err = provider
        .read_data("ipm_found_networks", json!({"names": []}))
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind(), "ConfigError");
}

// ── Connections ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_connections_report_server_endpoint_order() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "nc-42",
            "config": {"name": "nc1", "serviceMode": "XR-L1"},
            "endpoints": [
                {"id": "ep-b", "config": {"capacity": 100}},
                {"id": "ep-a", "config": {"capacity": 100}}
            ]
        }])))
        .mount(&server)
        .await;

    let out = provider
        .read_data("ipm_network_connections", json!({}))
        .await
        .unwrap();
    let data: NetworkConnectionsData = serde_json::from_value(out).unwrap();

    let nc = &data.connections[0];
    assert_eq!(nc.config.service_mode, Attr::Known("XR-L1".into()));
    let ids: Vec<_> = nc.endpoints.iter().map(|ep| ep.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("ep-b"), Some("ep-a")]);
}

#[tokio::test]
async fn test_nc_endpoints_lists_under_the_connection() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/network-connections/nc-42/endpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "ep-a",
            "parentId": "nc-42",
            "config": {
                "selector": {"moduleIfSelectorByModuleName": {"moduleName": "HubA", "moduleClientIfAid": "XR-T1"}},
                "capacity": 100
            }
        }])))
        .mount(&server)
        .await;

    let out = provider
        .read_data("ipm_nc_endpoints", json!({"nc_id": "nc-42"}))
        .await
        .unwrap();
    let data: NcEndpointsData = serde_json::from_value(out).unwrap();

    assert_eq!(data.endpoints.len(), 1);
    let ep = &data.endpoints[0];
    assert_eq!(ep.id, Attr::Known("ep-a".into()));
    assert_eq!(ep.capacity, Attr::Known(100));
    assert!(ep.selector.module_if_selector_by_module_name.is_some());
}

#[tokio::test]
async fn test_nc_endpoints_needs_the_connection_id() {
    let (_server, provider) = setup().await;
    let err = provider
        .read_data("ipm_nc_endpoints", json!({}))
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind(), "ConfigError");
}

// ── Circuits ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_acs_filter_by_owning_endpoint() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/acs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "ac-1", "parentId": "ep-a", "state": {"capacity": 100}},
            {"id": "ac-2", "parentId": "ep-b", "state": {"capacity": 100}}
        ])))
        .mount(&server)
        .await;

    let out = provider
        .read_data("ipm_nc_acs", json!({"endpoint_id": "ep-b"}))
        .await
        .unwrap();
    let data: AcsData = serde_json::from_value(out).unwrap();

    let ids: Vec<_> = data.acs.iter().map(|ac| ac.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("ac-2")]);
}
