//! Migration of HashiCorp Vault KV v2 secrets into the PAM vault
//!
//! Each source engine becomes one folder under the configured parent folder
//! and each leaf key one secret in that folder. The key's data map is
//! written as the secret's JSON payload. Sub-directories are not descended
//! into. The first failure stops the run; nothing already written is
//! rolled back.

pub mod vault;

use crate::client::{BearerToken, PamClient};
use crate::jose::Jwk;
use crate::types::SecretMetadata;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

pub use vault::{VaultConfig, VaultKvSource};

/// A store secrets are migrated from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Keys at the root of `engine`; sub-directories end in `/`
    async fn list(&self, engine: &str) -> Result<Vec<String>>;

    /// Latest data map stored under `key`
    async fn read(&self, engine: &str, key: &str) -> Result<Map<String, Value>>;

    /// Store name for log messages
    fn name(&self) -> &'static str;
}

/// A secret written (or planned) by a migration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedSecret {
    pub name: String,
    /// `None` in a dry run
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineReport {
    pub engine: String,
    /// `None` in a dry run
    pub folder_id: Option<String>,
    pub secrets: Vec<MigratedSecret>,
    /// Sub-directory keys that were not migrated
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub engines: Vec<EngineReport>,
}

impl MigrationReport {
    pub fn secret_count(&self) -> usize {
        self.engines.iter().map(|e| e.secrets.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.engines.iter().map(|e| e.skipped.len()).sum()
    }
}

/// Copies engines from a [`SecretStore`] into the PAM vault
pub struct Migrator<'a, S: SecretStore + ?Sized> {
    client: &'a PamClient,
    source: &'a S,
    description: Option<String>,
}

impl<'a, S: SecretStore + ?Sized> Migrator<'a, S> {
    pub fn new(client: &'a PamClient, source: &'a S) -> Self {
        Self {
            client,
            source,
            description: client.config().secret_description.clone(),
        }
    }

    /// Description for created folders and secrets, overriding the
    /// configured default
    pub fn with_description(mut self, description: Option<String>) -> Self {
        if description.is_some() {
            self.description = description;
        }
        self
    }

    /// List what a migration of `engines` would write
    ///
    /// Only the source is contacted. Secret values are not read.
    pub async fn plan(&self, engines: &[String]) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();
        for engine in engines {
            let engine = normalize_engine(engine);
            let (leaves, skipped) = self.list_engine(engine).await?;
            report.engines.push(EngineReport {
                engine: engine.to_string(),
                folder_id: None,
                secrets: leaves
                    .into_iter()
                    .map(|name| MigratedSecret { name, id: None })
                    .collect(),
                skipped,
            });
        }
        Ok(report)
    }

    /// Migrate `engines`, encrypting every secret to `recipient`
    pub async fn migrate(
        &self,
        token: &BearerToken,
        recipient: &Jwk,
        engines: &[String],
    ) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();
        for engine in engines {
            let engine_report = self
                .migrate_engine(token, recipient, normalize_engine(engine))
                .await?;
            report.engines.push(engine_report);
        }
        info!(
            "Migrated {} secrets from {} {} engine(s)",
            report.secret_count(),
            report.engines.len(),
            self.source.name()
        );
        Ok(report)
    }

    async fn migrate_engine(
        &self,
        token: &BearerToken,
        recipient: &Jwk,
        engine: &str,
    ) -> Result<EngineReport> {
        let (leaves, skipped) = self.list_engine(engine).await?;

        let folder = SecretMetadata::new(engine, &self.client.config().parent_folder_id)
            .with_description(self.description.clone());
        let folder_id = self
            .client
            .create_folder(token, &folder)
            .await
            .with_context(|| format!("Failed to create folder for engine '{}'", engine))?;

        let mut secrets = Vec::with_capacity(leaves.len());
        for key in leaves {
            let data = self.source.read(engine, &key).await?;
            let metadata =
                SecretMetadata::new(&key, &folder_id).with_description(self.description.clone());
            let id = self
                .client
                .create_secret(token, recipient, &metadata, &data)
                .await
                .with_context(|| format!("Failed to migrate secret '{}/{}'", engine, key))?;
            debug!(engine = %engine, key = %key, id = %id, "Migrated secret");
            secrets.push(MigratedSecret { name: key, id: Some(id) });
        }

        Ok(EngineReport {
            engine: engine.to_string(),
            folder_id: Some(folder_id),
            secrets,
            skipped,
        })
    }

    /// Split an engine's keys into leaves and skipped sub-directories
    async fn list_engine(&self, engine: &str) -> Result<(Vec<String>, Vec<String>)> {
        let keys = self.source.list(engine).await?;
        let (skipped, leaves): (Vec<String>, Vec<String>) =
            keys.into_iter().partition(|key| key.ends_with('/'));
        for dir in &skipped {
            warn!("Skipping sub-directory '{}{}' in {} engine", engine, dir, self.source.name());
        }
        Ok((leaves, skipped))
    }
}

fn normalize_engine(engine: &str) -> &str {
    engine.trim_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jose::{EphemeralKeyPair, KeyManagement};
    use mockall::predicate::eq;
    use pamvault_core::{PamConfig, SecureString};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRETS_PATH: &str =
        "/v1/teams/acme/resource_groups/rg-1/projects/proj-1/secrets";
    const FOLDERS_PATH: &str =
        "/v1/teams/acme/resource_groups/rg-1/projects/proj-1/secret_folders";

    fn client_for(server: &MockServer) -> PamClient {
        PamClient::new(PamConfig {
            host: server.uri(),
            team: "acme".to_string(),
            key_id: "key-id".to_string(),
            key_secret: SecureString::from("key-secret"),
            resource_group_id: "rg-1".to_string(),
            project_id: "proj-1".to_string(),
            parent_folder_id: "root-folder".to_string(),
            timeout: None,
            secret_description: Some("Migrated from Vault".to_string()),
        })
        .unwrap()
    }

    fn store_with_engine() -> MockSecretStore {
        let mut store = MockSecretStore::new();
        store.expect_name().return_const("mock");
        store
            .expect_list()
            .with(eq("kv"))
            .returning(|_| Ok(vec!["db".to_string(), "nested/".to_string(), "api".to_string()]));
        store
    }

    #[tokio::test]
    async fn test_migrate_one_folder_per_engine_one_secret_per_leaf() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(FOLDERS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "folder-kv"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SECRETS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "secret-1"})))
            .expect(2)
            .mount(&server)
            .await;

        let mut store = store_with_engine();
        store
            .expect_read()
            .times(2)
            .returning(|_, key| Ok(json!({"key": key}).as_object().cloned().unwrap_or_default()));

        let pair = EphemeralKeyPair::generate().unwrap();
        let recipient = pair.public_jwk().with_alg(KeyManagement::RsaOaep256);
        let client = client_for(&server);
        let token = BearerToken::new("token", None);

        let report = Migrator::new(&client, &store)
            .migrate(&token, &recipient, &["kv/".to_string()])
            .await
            .unwrap();

        assert_eq!(report.engines.len(), 1);
        let engine = &report.engines[0];
        assert_eq!(engine.engine, "kv");
        assert_eq!(engine.folder_id.as_deref(), Some("folder-kv"));
        assert_eq!(engine.skipped, vec!["nested/".to_string()]);
        let names: Vec<_> = engine.secrets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["db", "api"]);
        assert_eq!(report.secret_count(), 2);

        let requests = server.received_requests().await.unwrap();
        let folder: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(folder["name"], "kv");
        assert_eq!(folder["parent_folder_id"], "root-folder");
        assert_eq!(folder["description"], "Migrated from Vault");

        let secret: Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(secret["name"], "db");
        assert_eq!(secret["parent_folder_id"], "folder-kv");
        let jwe = secret["secret_jwe"].as_str().unwrap();
        let plaintext: Value = serde_json::from_slice(&pair.decrypt(jwe).unwrap()).unwrap();
        assert_eq!(plaintext, json!({"key": "db"}));
    }

    #[tokio::test]
    async fn test_migrate_secret_with_empty_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(FOLDERS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "folder-kv"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SECRETS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "secret-1"})))
            .expect(2)
            .mount(&server)
            .await;

        let mut store = MockSecretStore::new();
        store.expect_name().return_const("mock");
        store
            .expect_list()
            .returning(|_| Ok(vec!["empty".to_string(), "full".to_string()]));
        store.expect_read().times(2).returning(|_, key| {
            if key == "empty" {
                Ok(Map::new())
            } else {
                Ok(json!({"user": "admin"}).as_object().cloned().unwrap_or_default())
            }
        });

        let pair = EphemeralKeyPair::generate().unwrap();
        let recipient = pair.public_jwk().with_alg(KeyManagement::RsaOaep256);
        let client = client_for(&server);
        let token = BearerToken::new("token", None);

        let report = Migrator::new(&client, &store)
            .migrate(&token, &recipient, &["kv".to_string()])
            .await
            .unwrap();
        assert_eq!(report.secret_count(), 2);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
        let empty: Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(empty["name"], "empty");
        let plaintext = pair.decrypt(empty["secret_jwe"].as_str().unwrap()).unwrap();
        assert_eq!(&plaintext[..], b"{}");
    }

    #[tokio::test]
    async fn test_plan_makes_no_pam_calls() {
        let server = MockServer::start().await;
        let mut store = store_with_engine();
        store.expect_read().never();

        let client = client_for(&server);
        let report = Migrator::new(&client, &store)
            .plan(&["kv".to_string()])
            .await
            .unwrap();

        assert_eq!(report.secret_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert!(report.engines[0].folder_id.is_none());
        assert!(report.engines[0].secrets.iter().all(|s| s.id.is_none()));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_migrate_stops_at_first_write_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(FOLDERS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "folder-kv"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SECRETS_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("name already exists"))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_with_engine();
        store
            .expect_read()
            .times(1)
            .returning(|_, _| Ok(Map::new()));

        let pair = EphemeralKeyPair::generate().unwrap();
        let recipient = pair.public_jwk().with_alg(KeyManagement::RsaOaep);
        let client = client_for(&server);
        let token = BearerToken::new("token", None);

        let err = Migrator::new(&client, &store)
            .migrate(&token, &recipient, &["kv".to_string()])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("kv/db"));
        match err.downcast_ref::<pamvault_core::Error>() {
            Some(pamvault_core::Error::Write { status, body }) => {
                assert_eq!(*status, 400);
                assert_eq!(body, "name already exists");
            }
            other => panic!("expected write error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_source_failure_aborts_before_folder_creation() {
        let server = MockServer::start().await;
        let mut store = MockSecretStore::new();
        store.expect_name().return_const("mock");
        store
            .expect_list()
            .returning(|_| Err(anyhow::anyhow!("permission denied")));

        let client = client_for(&server);
        let token = BearerToken::new("token", None);
        let pair = EphemeralKeyPair::generate().unwrap();
        let recipient = pair.public_jwk().with_alg(KeyManagement::RsaOaep256);

        let err = Migrator::new(&client, &store)
            .migrate(&token, &recipient, &["kv".to_string()])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("permission denied"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_description_override() {
        let config = PamConfig {
            host: "http://localhost".to_string(),
            team: "acme".to_string(),
            key_id: "k".to_string(),
            key_secret: SecureString::from("s"),
            resource_group_id: "rg".to_string(),
            project_id: "p".to_string(),
            parent_folder_id: "f".to_string(),
            timeout: None,
            secret_description: Some("default".to_string()),
        };
        let client = PamClient::new(config).unwrap();
        let store = MockSecretStore::new();

        let migrator = Migrator::new(&client, &store);
        assert_eq!(migrator.description.as_deref(), Some("default"));
        let migrator = migrator.with_description(Some("custom".to_string()));
        assert_eq!(migrator.description.as_deref(), Some("custom"));
    }
}
