//! Service token authentication

use crate::client::{expect_success, read_json, BearerToken, PamClient};
use pamvault_core::types::{ServiceTokenRequest, ServiceTokenResponse};
use pamvault_core::{AuditLog, Error, Result};
use tracing::{debug, info};

impl PamClient {
    /// Exchange the configured service user key for a bearer token
    ///
    /// A non-success status fails with [`Error::Authentication`]; a success
    /// response without a `bearer_token` fails with [`Error::Protocol`].
    pub async fn authenticate(&self) -> Result<BearerToken> {
        let result = self.request_service_token().await;
        AuditLog::record("authenticate", &self.config.team, result)
    }

    async fn request_service_token(&self) -> Result<BearerToken> {
        let url = self.config.service_token_url();
        info!("Requesting service token for team {}", self.config.team);

        let body = ServiceTokenRequest {
            key_id: &self.config.key_id,
            key_secret: &self.config.key_secret,
        };
        let response = self.http.post(&url).json(&body).send().await?;
        let response = expect_success(response, |status, body| Error::Authentication {
            status,
            body,
        })
        .await?;

        let token: ServiceTokenResponse = read_json(response, "service token").await?;
        let bearer = token
            .bearer_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::protocol("service token response has no bearer_token"))?;

        debug!(
            expires_at = token.expires_at.as_deref().unwrap_or("unknown"),
            team_name = token.team_name.as_deref().unwrap_or("unknown"),
            "Obtained service token"
        );
        Ok(BearerToken::new(bearer, token.expires_at))
    }
}
