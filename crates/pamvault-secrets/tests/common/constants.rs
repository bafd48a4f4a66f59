//! Shared identifiers for tests

use pamvault_core::{PamConfig, SecureString};
use std::time::Duration;

pub const TEAM: &str = "acme";
pub const KEY_ID: &str = "svc-key-id";
pub const KEY_SECRET: &str = "svc-key-secret";
pub const RESOURCE_GROUP_ID: &str = "rg-0001";
pub const PROJECT_ID: &str = "proj-0001";
pub const PARENT_FOLDER_ID: &str = "folder-0001";
pub const BEARER_TOKEN: &str = "bearer-token-value";
pub const SECRET_ID: &str = "abc123";
pub const SERVER_KID: &str = "K1";

pub const SERVICE_TOKEN_PATH: &str = "/v1/teams/acme/service_token";
pub const JWKS_PATH: &str = "/v1/teams/acme/vault/jwks.json";
pub const SECRETS_PATH: &str = "/v1/teams/acme/resource_groups/rg-0001/projects/proj-0001/secrets";
pub const FOLDERS_PATH: &str =
    "/v1/teams/acme/resource_groups/rg-0001/projects/proj-0001/secret_folders";

pub fn secret_path(id: &str) -> String {
    format!("{}/{}", SECRETS_PATH, id)
}

/// Configuration pointing at a mock server
pub fn test_config(host: &str) -> PamConfig {
    PamConfig {
        host: host.to_string(),
        team: TEAM.to_string(),
        key_id: KEY_ID.to_string(),
        key_secret: SecureString::from(KEY_SECRET),
        resource_group_id: RESOURCE_GROUP_ID.to_string(),
        project_id: PROJECT_ID.to_string(),
        parent_folder_id: PARENT_FOLDER_ID.to_string(),
        timeout: Some(Duration::from_secs(10)),
        secret_description: None,
    }
}
