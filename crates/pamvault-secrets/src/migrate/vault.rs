//! HashiCorp Vault KV v2 source

use super::SecretStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use pamvault_core::SecureString;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};
use vaultrs::client::{Client, VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub address: String,
    pub token: SecureString,
    pub namespace: Option<String>,
    pub timeout: Duration,
    pub insecure_skip_verify: bool,
}

impl VaultConfig {
    pub fn from_env() -> Result<Self> {
        let address =
            std::env::var("VAULT_ADDR").context("VAULT_ADDR environment variable not set")?;
        let token =
            std::env::var("VAULT_TOKEN").context("VAULT_TOKEN environment variable not set")?;
        let namespace = std::env::var("VAULT_NAMESPACE")
            .ok()
            .filter(|ns| !ns.is_empty());
        let timeout_secs = std::env::var("VAULT_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let insecure_skip_verify = std::env::var("VAULT_SKIP_VERIFY")
            .ok()
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            token: SecureString::new(token),
            namespace,
            timeout: Duration::from_secs(timeout_secs),
            insecure_skip_verify,
        })
    }
}

/// Reads secrets from KV v2 engines
pub struct VaultKvSource {
    config: VaultConfig,
}

impl VaultKvSource {
    pub fn new(config: VaultConfig) -> Self {
        Self { config }
    }

    fn create_client(&self) -> Result<VaultClient> {
        let mut settings = VaultClientSettingsBuilder::default();
        settings.address(&self.config.address);
        settings.timeout(Some(self.config.timeout));

        if let Some(ns) = &self.config.namespace {
            settings.namespace(Some(ns.clone()));
        }

        if self.config.insecure_skip_verify {
            warn!("TLS verification disabled");
            settings.verify(false);
        }

        let mut client = VaultClient::new(settings.build()?)?;
        client.set_token(self.config.token.as_str());
        Ok(client)
    }

    pub async fn check_health(&self) -> Result<bool> {
        let client = reqwest::Client::new();
        let url = format!("{}/v1/sys/health", self.config.address);

        match client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => Err(e).context("Failed to check Vault health"),
        }
    }
}

#[async_trait]
impl SecretStore for VaultKvSource {
    async fn list(&self, engine: &str) -> Result<Vec<String>> {
        let client = self.create_client()?;
        match kv2::list(&client, engine, "").await {
            Ok(keys) => {
                debug!("Listed {} keys in Vault engine {}", keys.len(), engine);
                Ok(keys)
            }
            // An engine without secrets has no metadata to list
            Err(ClientError::APIError { code: 404, .. }) => Ok(Vec::new()),
            Err(e) => Err(e).context(format!("Failed to list Vault engine '{}'", engine)),
        }
    }

    async fn read(&self, engine: &str, key: &str) -> Result<Map<String, Value>> {
        let client = self.create_client()?;
        let data = kv2::read::<Map<String, Value>>(&client, engine, key)
            .await
            .with_context(|| format!("Failed to read Vault secret '{}/{}'", engine, key))?;
        debug!("Read secret from Vault: {}/{}", engine, key);
        Ok(data)
    }

    fn name(&self) -> &'static str {
        "vault"
    }
}
