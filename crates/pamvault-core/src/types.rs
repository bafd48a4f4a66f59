//! Request and response payloads of the PAM vault API

use crate::security::SecureString;
use serde::{Deserialize, Serialize, Serializer};

/// Body of `POST /v1/teams/{team}/service_token`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceTokenRequest<'a> {
    pub key_id: &'a str,
    #[serde(serialize_with = "expose_secure")]
    pub key_secret: &'a SecureString,
}

fn expose_secure<S: Serializer>(value: &&SecureString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_str())
}

/// Response of the service token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceTokenResponse {
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
}

/// Response of `GET /v1/teams/{team}/vault/jwks.json`
///
/// Keys are kept as raw JSON so the selected key can be handed on exactly as
/// the server sent it.
#[derive(Debug, Clone, Deserialize)]
pub struct JwksResponse {
    #[serde(default)]
    pub keys: Vec<serde_json::Value>,
}

/// Body of secret create (POST) and update (PUT)
#[derive(Debug, Clone, Serialize)]
pub struct SecretRequest<'a> {
    pub name: &'a str,
    pub secret_jwe: &'a str,
    pub parent_folder_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// Body of secret folder creation
#[derive(Debug, Clone, Serialize)]
pub struct FolderRequest<'a> {
    pub name: &'a str,
    pub parent_folder_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// Response of secret and folder create/update
///
/// Only the id is used; other members are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectResponse {
    pub id: Option<String>,
}

/// Body of a secret reveal request
#[derive(Debug, Clone, Serialize)]
pub struct RevealRequest<'a> {
    pub public_key: &'a serde_json::Value,
}

/// Response of a secret reveal
#[derive(Debug, Clone, Deserialize)]
pub struct RevealResponse {
    pub secret_jwe: Option<String>,
}
