//! CLI command implementations

pub mod demo;
pub mod folder;
pub mod jwks;
pub mod migrate;
pub mod secret;

use anyhow::{Context, Result};
use pamvault_core::PamConfig;
use pamvault_secrets::{BearerToken, Jwk, PamClient};
use serde_json::Value;

use crate::output;

/// Build a client from the `OKTAPAM_*` environment
pub(crate) fn client_from_env() -> Result<PamClient> {
    let config = PamConfig::from_env().context("Failed to load PAM configuration")?;
    Ok(PamClient::new(config)?)
}

/// Authenticate with a spinner
pub(crate) async fn login(client: &PamClient) -> Result<BearerToken> {
    let spinner = output::spinner(&format!("Logging in to team {}...", client.config().team));
    let token = client.authenticate().await;
    spinner.finish_and_clear();
    let token = token?;
    if let Some(expires_at) = token.expires_at() {
        tracing::debug!("Service token expires at {}", expires_at);
    }
    Ok(token)
}

/// Authenticate and fetch the vault encryption key
pub(crate) async fn login_with_key(client: &PamClient) -> Result<(BearerToken, Jwk)> {
    let token = login(client).await?;
    let spinner = output::spinner("Fetching vault encryption key...");
    let key = client.fetch_encryption_key(&token).await;
    spinner.finish_and_clear();
    Ok((token, key?))
}

/// Parse a `--payload` argument
pub(crate) fn parse_payload(payload: &str) -> Result<Value> {
    serde_json::from_str(payload).context("--payload is not valid JSON")
}

/// Render revealed plaintext, pretty-printing JSON
pub(crate) fn render_plaintext(plaintext: &str, raw: bool) -> String {
    if raw {
        return plaintext.to_string();
    }
    serde_json::from_str::<Value>(plaintext)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| plaintext.to_string())
}
