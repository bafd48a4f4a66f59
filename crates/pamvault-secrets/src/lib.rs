//! Client for an Okta PAM team vault
//!
//! This crate provides:
//! - **Authentication**: service user key exchanged for a bearer token
//! - **Envelope encryption**: payloads sealed into JWE for the vault's RSA key
//! - **Reveal**: secrets re-encrypted by the server to a single-use key pair
//! - **Migration**: HashiCorp Vault KV v2 engines copied into vault folders

// Core modules
pub mod client;
pub mod jose;
pub mod migrate;
pub mod naming;
pub mod types;

// Operations on PamClient
mod auth;
mod folder;
mod keys;
mod reader;
mod writer;

// Re-export commonly used items
pub use client::{BearerToken, PamClient};
pub use jose::{EphemeralKeyPair, Jwk, KeyManagement};
pub use migrate::{MigrationReport, Migrator, SecretStore, VaultConfig, VaultKvSource};
pub use types::{RevealedSecret, SecretMetadata};
pub use writer::seal_payload;

use pamvault_core::Result;
use serde::Serialize;

/// Authenticate, store `payload` as a new randomly named secret in the
/// configured folder, then reveal it again
///
/// Returns the new secret's id and the revealed plaintext.
pub async fn write_and_reveal<T: Serialize + ?Sized>(
    client: &PamClient,
    payload: &T,
) -> Result<(String, RevealedSecret)> {
    let token = client.authenticate().await?;
    let key = client.fetch_encryption_key(&token).await?;

    let metadata = SecretMetadata::generated(&client.config().parent_folder_id)
        .with_description(client.config().secret_description.clone());
    let secret_id = client.create_secret(&token, &key, &metadata, payload).await?;
    let revealed = client.reveal_secret(&token, &secret_id).await?;
    Ok((secret_id, revealed))
}
