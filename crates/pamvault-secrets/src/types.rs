//! Secret-level types shared by the write, read and migration paths

use crate::naming;
use pamvault_core::{Error, Result};
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

/// Name, placement and description of a secret or folder to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretMetadata {
    pub name: String,
    pub parent_folder_id: String,
    pub description: Option<String>,
}

impl SecretMetadata {
    pub fn new(name: impl Into<String>, parent_folder_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_folder_id: parent_folder_id.into(),
            description: None,
        }
    }

    /// Metadata with a random 10-character name
    pub fn generated(parent_folder_id: impl Into<String>) -> Self {
        Self::new(naming::random_name(), parent_folder_id)
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }
}

/// Plaintext of a revealed secret
///
/// The buffer is zeroed on drop and never printed by `Debug`.
pub struct RevealedSecret {
    secret_id: String,
    plaintext: Zeroizing<Vec<u8>>,
}

impl RevealedSecret {
    pub fn new(secret_id: impl Into<String>, plaintext: Zeroizing<Vec<u8>>) -> Self {
        Self {
            secret_id: secret_id.into(),
            plaintext,
        }
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.plaintext
    }

    /// Plaintext as UTF-8
    pub fn as_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.plaintext)
            .map_err(|e| Error::decryption(format!("plaintext is not valid UTF-8: {}", e)))
    }

    /// Parse the plaintext as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.plaintext)?)
    }
}

impl std::fmt::Debug for RevealedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealedSecret")
            .field("secret_id", &self.secret_id)
            .field("plaintext", &"[REDACTED]")
            .finish()
    }
}
