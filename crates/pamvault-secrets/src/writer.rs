//! Secret creation and update
//!
//! Payloads are serialized to JSON and sealed into a JWE for the vault's
//! encryption key before they leave the process. The plaintext is never
//! logged or sent.

use crate::client::{expect_status, read_json, BearerToken, PamClient};
use crate::jose::{self, Jwk};
use crate::types::SecretMetadata;
use pamvault_core::types::{ObjectResponse, SecretRequest};
use pamvault_core::{AuditLog, Error, Result};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Serialize `payload` and encrypt it to `recipient`
pub fn seal_payload<T: Serialize + ?Sized>(payload: &T, recipient: &Jwk) -> Result<String> {
    let plaintext = Zeroizing::new(serde_json::to_vec(payload)?);
    jose::encrypt(&plaintext, recipient)
}

impl PamClient {
    /// Create a secret holding `payload` and return its server-assigned id
    ///
    /// Anything but `201 Created` fails with [`Error::Write`] carrying the
    /// status and response body.
    pub async fn create_secret<T: Serialize + ?Sized>(
        &self,
        token: &BearerToken,
        recipient: &Jwk,
        metadata: &SecretMetadata,
        payload: &T,
    ) -> Result<String> {
        let result: Result<String> = async {
            let secret_jwe = seal_payload(payload, recipient)?;
            let url = self.config.secrets_url();
            debug!(name = %metadata.name, "Creating secret at {}", url);

            let body = secret_request(metadata, &secret_jwe);
            let response = self
                .authorized(self.http.post(&url), token)
                .json(&body)
                .send()
                .await?;
            let response = expect_status(response, StatusCode::CREATED, |status, body| {
                Error::Write { status, body }
            })
            .await?;

            let id = object_id(read_json(response, "secret creation").await?)?;
            info!(name = %metadata.name, id = %id, "Created secret");
            Ok(id)
        }
        .await;
        AuditLog::record("create_secret", &metadata.name, result)
    }

    /// Replace the contents of an existing secret
    ///
    /// Sent as `PUT`; anything but `201 Created` fails with
    /// [`Error::Update`].
    pub async fn update_secret<T: Serialize + ?Sized>(
        &self,
        token: &BearerToken,
        recipient: &Jwk,
        secret_id: &str,
        metadata: &SecretMetadata,
        payload: &T,
    ) -> Result<String> {
        let result: Result<String> = async {
            let secret_jwe = seal_payload(payload, recipient)?;
            let url = self.config.secret_url(secret_id);
            debug!(id = %secret_id, "Updating secret at {}", url);

            let body = secret_request(metadata, &secret_jwe);
            let response = self
                .authorized(self.http.put(&url), token)
                .json(&body)
                .send()
                .await?;
            let response = expect_status(response, StatusCode::CREATED, |status, body| {
                Error::Update { status, body }
            })
            .await?;

            let id = object_id(read_json(response, "secret update").await?)?;
            info!(id = %id, "Updated secret");
            Ok(id)
        }
        .await;
        AuditLog::record("update_secret", secret_id, result)
    }
}

fn secret_request<'a>(metadata: &'a SecretMetadata, secret_jwe: &'a str) -> SecretRequest<'a> {
    SecretRequest {
        name: &metadata.name,
        secret_jwe,
        parent_folder_id: &metadata.parent_folder_id,
        description: metadata.description.as_deref(),
    }
}

pub(crate) fn object_id(response: ObjectResponse) -> Result<String> {
    response
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::protocol("response has no id"))
}
