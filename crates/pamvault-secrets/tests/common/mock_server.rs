//! Wiremock setup helpers for the vault endpoints

use super::constants::*;
use pamvault_secrets::{BearerToken, Jwk, PamClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a server and a client configured against it
pub async fn setup() -> (MockServer, PamClient) {
    let server = MockServer::start().await;
    let client = PamClient::new(test_config(&server.uri())).unwrap();
    (server, client)
}

pub fn bearer() -> BearerToken {
    BearerToken::new(BEARER_TOKEN, None)
}

/// Service token endpoint accepting the test credentials
pub async fn mock_service_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(SERVICE_TOKEN_PATH))
        .and(body_json(json!({"key_id": KEY_ID, "key_secret": KEY_SECRET})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bearer_token": BEARER_TOKEN,
            "expires_at": "2026-10-16T12:00:00Z",
            "team_name": TEAM,
        })))
        .mount(server)
        .await;
}

/// JWKS endpoint publishing `keys`
pub async fn mock_jwks(server: &MockServer, keys: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .and(header("authorization", format!("Bearer {}", BEARER_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": keys })))
        .mount(server)
        .await;
}

/// JWKS endpoint publishing a single key
pub async fn mock_jwks_key(server: &MockServer, key: &Jwk) {
    mock_jwks(server, vec![key.to_value().unwrap()]).await;
}

/// Secret creation answering with `status` and a JSON body
pub async fn mock_create_secret(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(SECRETS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Folder creation answering with `status` and a JSON body
pub async fn mock_create_folder(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(FOLDERS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Any endpoint answering with `status` and a plain-text body
pub async fn mock_text(server: &MockServer, http_method: &str, url_path: &str, status: u16, body: &str) {
    Mock::given(method(http_method))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// JSON body of the `index`th request the server received
pub async fn request_body(server: &MockServer, index: usize) -> Value {
    let requests = server.received_requests().await.unwrap();
    serde_json::from_slice(&requests[index].body).unwrap()
}
