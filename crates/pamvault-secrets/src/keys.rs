//! Vault encryption key discovery

use crate::client::{expect_success, read_json, BearerToken, PamClient};
use crate::jose::Jwk;
use pamvault_core::types::JwksResponse;
use pamvault_core::{AuditLog, Error, Result};
use serde_json::Value;
use tracing::{debug, info};

impl PamClient {
    /// Fetch the team vault's published key set, as raw JSON keys
    pub async fn fetch_jwks(&self, token: &BearerToken) -> Result<Vec<Value>> {
        let url = self.config.jwks_url();
        debug!("Fetching JWKS from {}", url);

        let response = self.authorized(self.http.get(&url), token).send().await?;
        let response = expect_success(response, |status, body| {
            Error::protocol(format!("could not obtain JWKS (status {}): {}", status, body))
        })
        .await?;

        let jwks: JwksResponse = read_json(response, "JWKS").await?;
        Ok(jwks.keys)
    }

    /// Select the key secrets are encrypted to
    ///
    /// The first key of the set is used; an empty set is a protocol error.
    pub async fn fetch_encryption_key(&self, token: &BearerToken) -> Result<Jwk> {
        let result: Result<Jwk> = async {
            let first = self
                .fetch_jwks(token)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| Error::protocol("JWKS response did not contain any keys"))?;
            let key = Jwk::from_value(first)?;
            info!(
                kid = key.kid.as_deref().unwrap_or("none"),
                alg = key.alg.as_deref().unwrap_or("none"),
                "Selected vault encryption key"
            );
            Ok(key)
        }
        .await;
        AuditLog::record("fetch_encryption_key", &self.config.team, result)
    }
}
