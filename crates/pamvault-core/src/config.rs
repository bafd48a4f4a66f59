//! PAM vault client configuration
//!
//! Configuration is read once at startup, from the environment, into an
//! immutable [`PamConfig`] that is handed to the client.

use crate::error::{Error, Result};
use crate::security::SecureString;
use std::time::Duration;
use tracing::debug;

/// PAM API host, e.g. `https://example.pam.okta.com`
pub const ENV_API_HOST: &str = "OKTAPAM_API_HOST";
/// Team name used in every API path
pub const ENV_TEAM: &str = "OKTAPAM_TEAM";
/// Service user key id
pub const ENV_KEY: &str = "OKTAPAM_KEY";
/// Service user key secret
pub const ENV_SECRET: &str = "OKTAPAM_SECRET";
/// Resource group holding the target project
pub const ENV_RESOURCE_GROUP_ID: &str = "OKTAPAM_RESOURCE_GROUP_ID";
/// Project holding the secrets
pub const ENV_PROJECT_ID: &str = "OKTAPAM_PROJECT_ID";
/// Folder new secrets are created under
pub const ENV_PARENT_SECRET_FOLDER_ID: &str = "OKTAPAM_PARENT_SECRET_FOLDER_ID";
/// Optional per-request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "OKTAPAM_TIMEOUT_SECS";
/// Optional default description for created secrets and folders
pub const ENV_SECRET_DESCRIPTION: &str = "OKTAPAM_SECRET_DESCRIPTION";

/// Immutable settings for one run against the PAM vault
#[derive(Debug, Clone)]
pub struct PamConfig {
    /// API host without trailing slash
    pub host: String,
    pub team: String,
    pub key_id: String,
    pub key_secret: SecureString,
    pub resource_group_id: String,
    pub project_id: String,
    pub parent_folder_id: String,
    /// `None` keeps the HTTP client's default (no timeout)
    pub timeout: Option<Duration>,
    pub secret_description: Option<String>,
}

impl PamConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Required variables are checked in a fixed order and the first missing
    /// one is reported by name. Empty values count as missing. Identifiers
    /// are trimmed; the key secret is kept verbatim.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::missing_variable(name))
        };
        let optional = |name: &str| -> Option<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = required(ENV_API_HOST)?.trim_end_matches('/').to_string();
        let team = required(ENV_TEAM)?;
        let key_id = required(ENV_KEY)?;
        // Secrets are used exactly as given; only a blank value is missing
        let key_secret = lookup(ENV_SECRET)
            .filter(|v| !v.trim().is_empty())
            .map(SecureString::new)
            .ok_or_else(|| Error::missing_variable(ENV_SECRET))?;
        let resource_group_id = required(ENV_RESOURCE_GROUP_ID)?;
        let project_id = required(ENV_PROJECT_ID)?;
        let parent_folder_id = required(ENV_PARENT_SECRET_FOLDER_ID)?;

        let timeout = match optional(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    Error::configuration(format!(
                        "{} must be a positive number of seconds, got '{}'",
                        ENV_TIMEOUT_SECS, raw
                    ))
                })?;
                if secs == 0 {
                    return Err(Error::configuration(format!(
                        "{} must be greater than zero",
                        ENV_TIMEOUT_SECS
                    )));
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let config = Self {
            host,
            team,
            key_id,
            key_secret,
            resource_group_id,
            project_id,
            parent_folder_id,
            timeout,
            secret_description: optional(ENV_SECRET_DESCRIPTION),
        };
        debug!(host = %config.host, team = %config.team, "Loaded PAM configuration");
        Ok(config)
    }

    /// Base of every team-scoped path
    pub fn team_url(&self) -> String {
        format!("{}/v1/teams/{}", self.host, self.team)
    }

    pub fn service_token_url(&self) -> String {
        format!("{}/service_token", self.team_url())
    }

    pub fn jwks_url(&self) -> String {
        format!("{}/vault/jwks.json", self.team_url())
    }

    fn project_url(&self) -> String {
        format!(
            "{}/resource_groups/{}/projects/{}",
            self.team_url(),
            self.resource_group_id,
            self.project_id
        )
    }

    pub fn secrets_url(&self) -> String {
        format!("{}/secrets", self.project_url())
    }

    /// Used for both update (PUT) and reveal (POST)
    pub fn secret_url(&self, secret_id: &str) -> String {
        format!("{}/{}", self.secrets_url(), secret_id)
    }

    pub fn secret_folders_url(&self) -> String {
        format!("{}/secret_folders", self.project_url())
    }
}
