#![allow(clippy::unwrap_used)]
// Integration tests for the password-grant sign-in using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipm_api::auth::{server_root, sign_in};
use ipm_api::{Credentials, Error, IpmClient, TransportConfig};

const TOKEN_PATH: &str = "/realms/xr-cm/protocol/openid-connect/token";

fn creds(password: &str) -> Credentials {
    Credentials::new("admin", password.to_owned())
}

#[tokio::test]
async fn test_sign_in_posts_password_grant_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=xr-web-client"))
        .and(body_string_contains("client_secret=xr-web-client"))
        .and(body_string_contains("username=admin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-1", "expires_in": 300})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let root = server_root(&server.uri()).unwrap();
    let http = TransportConfig::default().build_client().unwrap();
    let token = sign_in(&http, &root, &creds("secret")).await.unwrap();

    assert_eq!(token.expose(), "Bearer tok-1");
}

#[tokio::test]
async fn test_refused_credentials_are_an_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let result = IpmClient::connect(&server.uri(), &creds("bad"), &TransportConfig::default()).await;

    match result {
        Err(Error::Authentication { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid_grant");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_token_response_is_a_deserialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = IpmClient::connect(&server.uri(), &creds("secret"), &TransportConfig::default()).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

#[tokio::test]
async fn test_empty_password_never_reaches_the_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = IpmClient::connect(&server.uri(), &creds(""), &TransportConfig::default()).await;
    assert!(matches!(result, Err(Error::MissingCredentials("password"))));
}
