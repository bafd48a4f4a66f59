//! HTTP client for the PAM vault API
//!
//! The per-component operations live in sibling modules as `impl PamClient`
//! blocks: [`crate::auth`], [`crate::keys`], [`crate::writer`],
//! [`crate::reader`].

use pamvault_core::{Error, PamConfig, Result, SecureString};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Short-lived credential returned by the service token endpoint
#[derive(Debug, Clone)]
pub struct BearerToken {
    token: SecureString,
    expires_at: Option<String>,
}

impl BearerToken {
    pub fn new(token: impl Into<String>, expires_at: Option<String>) -> Self {
        Self {
            token: SecureString::new(token.into()),
            expires_at,
        }
    }

    pub fn as_str(&self) -> &str {
        self.token.as_str()
    }

    /// Expiry as reported by the server, unparsed
    pub fn expires_at(&self) -> Option<&str> {
        self.expires_at.as_deref()
    }
}

/// Client for one team's vault
///
/// Holds the immutable configuration and a reusable HTTP connection pool.
/// Every call is a single request; nothing is retried.
#[derive(Debug, Clone)]
pub struct PamClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: Arc<PamConfig>,
}

impl PamClient {
    /// Create a client for `config`
    ///
    /// A configured timeout applies to each request; without one the HTTP
    /// client's default is kept.
    pub fn new(config: PamConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("pamvault/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        debug!(host = %config.host, team = %config.team, "Created PAM client");
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &PamConfig {
        &self.config
    }

    /// Attach the bearer token and JSON accept header
    pub(crate) fn authorized(&self, request: RequestBuilder, token: &BearerToken) -> RequestBuilder {
        request
            .bearer_auth(token.as_str())
            .header(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE))
    }
}

/// Pass `response` through when it has `expected` status, otherwise build an
/// error from the status and raw body
pub(crate) async fn expect_status<F>(
    response: Response,
    expected: StatusCode,
    error: F,
) -> Result<Response>
where
    F: FnOnce(u16, String) -> Error,
{
    if response.status() == expected {
        return Ok(response);
    }
    Err(rejection(response, error).await)
}

/// Like [`expect_status`] but accepting any 2xx status
pub(crate) async fn expect_success<F>(response: Response, error: F) -> Result<Response>
where
    F: FnOnce(u16, String) -> Error,
{
    if response.status().is_success() {
        return Ok(response);
    }
    Err(rejection(response, error).await)
}

async fn rejection<F>(response: Response, error: F) -> Error
where
    F: FnOnce(u16, String) -> Error,
{
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!(status, error = %e, "Could not read response body");
            String::new()
        }
    };
    warn!(status, "Unexpected response status");
    error(status, body)
}

/// Decode a JSON body, reporting malformed content as a protocol error
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::protocol(format!("invalid {} response: {}", what, e)))
}
