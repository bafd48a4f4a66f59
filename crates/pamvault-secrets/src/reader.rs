//! Secret reveal

use crate::client::{expect_status, read_json, BearerToken, PamClient};
use crate::jose::EphemeralKeyPair;
use crate::types::RevealedSecret;
use pamvault_core::types::{RevealRequest, RevealResponse};
use pamvault_core::{AuditLog, Error, Result};
use reqwest::StatusCode;
use tracing::{debug, info};

impl PamClient {
    /// Reveal a secret's plaintext
    ///
    /// A fresh RSA key pair is generated for every call. Only its public
    /// JWK is sent; the server re-encrypts the secret to it and the private
    /// key is discarded once the response is decrypted. Anything but
    /// `200 OK` fails with [`Error::Reveal`].
    pub async fn reveal_secret(&self, token: &BearerToken, secret_id: &str) -> Result<RevealedSecret> {
        let result = self.request_reveal(token, secret_id).await;
        AuditLog::record("reveal_secret", secret_id, result)
    }

    async fn request_reveal(&self, token: &BearerToken, secret_id: &str) -> Result<RevealedSecret> {
        let pair = tokio::task::spawn_blocking(EphemeralKeyPair::generate)
            .await
            .map_err(|e| Error::invalid_key(format!("key generation task failed: {}", e)))??;
        let public_key = pair.public_jwk().to_value()?;

        let url = self.config.secret_url(secret_id);
        debug!(id = %secret_id, kid = %pair.kid(), "Revealing secret at {}", url);

        let response = self
            .authorized(self.http.post(&url), token)
            .json(&RevealRequest {
                public_key: &public_key,
            })
            .send()
            .await?;
        let response = expect_status(response, StatusCode::OK, |status, body| Error::Reveal {
            status,
            body,
        })
        .await?;

        let reveal: RevealResponse = read_json(response, "secret reveal").await?;
        let secret_jwe = reveal
            .secret_jwe
            .filter(|jwe| !jwe.is_empty())
            .ok_or_else(|| Error::protocol("reveal response has no secret_jwe"))?;

        let plaintext = pair.decrypt(&secret_jwe)?;
        info!(id = %secret_id, "Revealed secret");
        Ok(RevealedSecret::new(secret_id, plaintext))
    }
}
