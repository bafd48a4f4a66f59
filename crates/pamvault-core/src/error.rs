//! Error types for pamvault-core

use thiserror::Error;

/// Result type alias using pamvault-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the PAM vault
///
/// Every variant is fatal to a run; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Required environment variable missing or empty
    #[error("Configuration error: expected environment variable {variable} to be set")]
    MissingVariable { variable: String },

    /// Configuration value present but unusable
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Service token exchange rejected
    #[error("Could not login (status {status}): {body}")]
    Authentication { status: u16, body: String },

    /// Malformed or empty server response
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Secret creation returned something other than 201
    #[error("Error creating secret (status {status}): {body}")]
    Write { status: u16, body: String },

    /// Secret update returned something other than 201
    #[error("Error updating secret (status {status}): {body}")]
    Update { status: u16, body: String },

    /// Secret reveal returned something other than 200
    #[error("Error revealing secret (status {status}): {body}")]
    Reveal { status: u16, body: String },

    /// Secret folder creation returned something other than 201
    #[error("Error creating secret folder (status {status}): {body}")]
    Folder { status: u16, body: String },

    /// Key material could not be used
    #[error("Invalid key: {message}")]
    InvalidKey { message: String },

    /// JWE encryption failed
    #[error("Encryption failed: {message}")]
    Encryption { message: String },

    /// JWE decryption failed
    #[error("Decryption failed: {message}")]
    Decryption { message: String },

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing variable error
    pub fn missing_variable(variable: impl Into<String>) -> Self {
        Self::MissingVariable {
            variable: variable.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Create an encryption error
    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption {
            message: message.into(),
        }
    }

    /// Create a decryption error
    pub fn decryption(message: impl Into<String>) -> Self {
        Self::Decryption {
            message: message.into(),
        }
    }

    /// Whether this error came from configuration loading
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingVariable { .. } | Self::Configuration { .. }
        )
    }

    /// Raw server response body, when the error carries one
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Authentication { body, .. }
            | Self::Write { body, .. }
            | Self::Update { body, .. }
            | Self::Reveal { body, .. }
            | Self::Folder { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_names_variable() {
        let err = Error::missing_variable("OKTAPAM_TEAM");
        assert!(err.to_string().contains("OKTAPAM_TEAM"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_write_error_carries_body() {
        let err = Error::Write {
            status: 400,
            body: r#"{"message":"name taken"}"#.to_string(),
        };
        assert_eq!(err.response_body(), Some(r#"{"message":"name taken"}"#));
        assert!(err.to_string().contains("name taken"));
        assert!(err.to_string().contains("400"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_authentication_error_carries_body() {
        let err = Error::Authentication {
            status: 401,
            body: "invalid key".to_string(),
        };
        assert_eq!(err.response_body(), Some("invalid key"));
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("invalid key"));
    }

    #[test]
    fn test_protocol_error_has_no_body() {
        let err = Error::protocol("jwks response did not contain any keys");
        assert!(err.response_body().is_none());
    }
}
