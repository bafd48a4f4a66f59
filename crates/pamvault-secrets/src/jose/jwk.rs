//! JSON Web Keys (RFC 7517) for RSA key management

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use pamvault_core::{Error, Result};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

/// A JSON Web Key
///
/// Only the members needed for RSA key wrapping are typed; anything else the
/// server sends is kept in `extra` so the key serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Jwk {
    /// Parse a key from its JSON object text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid_key(format!("not a JWK: {}", e)))
    }

    /// Parse a key from a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::invalid_key(format!("not a JWK: {}", e)))
    }

    /// Serialize to a JSON object string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Public JWK for an RSA key (`kty`, `kid`, `n`, `e`)
    pub fn from_rsa_public_key(key: &RsaPublicKey, kid: impl Into<String>) -> Self {
        Self {
            kty: "RSA".to_string(),
            kid: Some(kid.into()),
            alg: None,
            key_use: None,
            n: Some(URL_SAFE_NO_PAD.encode(key.n().to_bytes_be())),
            e: Some(URL_SAFE_NO_PAD.encode(key.e().to_bytes_be())),
            extra: Map::new(),
        }
    }

    pub fn with_alg(mut self, alg: KeyManagement) -> Self {
        self.alg = Some(alg.as_str().to_string());
        self
    }

    /// Build the RSA public key described by `n` and `e`
    pub fn to_rsa_public_key(&self) -> Result<RsaPublicKey> {
        if self.kty != "RSA" {
            return Err(Error::invalid_key(format!(
                "unsupported key type '{}', expected RSA",
                self.kty
            )));
        }
        let n = decode_uint(self.n.as_deref(), "n")?;
        let e = decode_uint(self.e.as_deref(), "e")?;
        RsaPublicKey::new(n, e).map_err(|e| Error::invalid_key(e.to_string()))
    }

    /// Whether the key carries private material
    pub fn is_private(&self) -> bool {
        self.extra.contains_key("d")
    }
}

fn decode_uint(value: Option<&str>, member: &str) -> Result<BigUint> {
    let encoded =
        value.ok_or_else(|| Error::invalid_key(format!("RSA key is missing '{}'", member)))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .map_err(|e| Error::invalid_key(format!("'{}' is not base64url: {}", member, e)))?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Key management algorithms for wrapping the content encryption key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyManagement {
    /// RSAES-OAEP with SHA-1 and MGF1-SHA-1
    RsaOaep,
    /// RSAES-OAEP with SHA-256 and MGF1-SHA-256
    RsaOaep256,
}

impl KeyManagement {
    pub fn from_alg(alg: &str) -> Option<Self> {
        match alg {
            "RSA-OAEP" => Some(Self::RsaOaep),
            "RSA-OAEP-256" => Some(Self::RsaOaep256),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RsaOaep => "RSA-OAEP",
            Self::RsaOaep256 => "RSA-OAEP-256",
        }
    }

    fn padding(&self) -> Oaep {
        match self {
            Self::RsaOaep => Oaep::new::<sha1::Sha1>(),
            Self::RsaOaep256 => Oaep::new::<sha2::Sha256>(),
        }
    }

    /// Encrypt the content encryption key for `recipient`
    pub fn wrap(&self, recipient: &RsaPublicKey, cek: &[u8]) -> Result<Vec<u8>> {
        recipient
            .encrypt(&mut rand::rngs::OsRng, self.padding(), cek)
            .map_err(|e| Error::encryption(format!("{} key wrap failed: {}", self.as_str(), e)))
    }

    /// Recover the content encryption key with `key`
    pub fn unwrap(&self, key: &RsaPrivateKey, encrypted_key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        key.decrypt(self.padding(), encrypted_key)
            .map(Zeroizing::new)
            .map_err(|_| {
                Error::decryption(format!(
                    "{} could not unwrap the content key (wrong private key?)",
                    self.as_str()
                ))
            })
    }
}

impl std::fmt::Display for KeyManagement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
