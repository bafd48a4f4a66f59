//! JWE compact serialization (RFC 7516) with A256GCM content encryption
//!
//! ```text
//! BASE64URL(protected header) . BASE64URL(encrypted CEK) . BASE64URL(IV)
//!     . BASE64URL(ciphertext) . BASE64URL(tag)
//! ```
//!
//! The ASCII of the encoded protected header is the AES-GCM additional
//! authenticated data.

use super::jwk::{Jwk, KeyManagement};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use pamvault_core::{Error, Result};
use rand::RngCore;
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

/// Content encryption method
pub const ENC_A256GCM: &str = "A256GCM";

/// Size of the content encryption key in bytes (256 bits)
const CEK_SIZE: usize = 32;

/// Size of the AES-GCM initialization vector in bytes (96 bits)
const IV_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
const TAG_SIZE: usize = 16;

/// JWE protected header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JweHeader {
    pub enc: String,
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Encrypt `plaintext` for the holder of `recipient`'s private key
///
/// The protected header is `{enc: A256GCM, alg, kid}` with `alg` and `kid`
/// taken from the key.
pub fn encrypt(plaintext: &[u8], recipient: &Jwk) -> Result<String> {
    let alg = recipient
        .alg
        .as_deref()
        .ok_or_else(|| Error::encryption("recipient key has no 'alg'"))?;
    let key_management = KeyManagement::from_alg(alg).ok_or_else(|| {
        Error::encryption(format!("unsupported key management algorithm '{}'", alg))
    })?;
    let kid = recipient
        .kid
        .clone()
        .ok_or_else(|| Error::encryption("recipient key has no 'kid'"))?;
    let public_key = recipient.to_rsa_public_key()?;

    let header = JweHeader {
        enc: ENC_A256GCM.to_string(),
        alg: key_management.as_str().to_string(),
        kid: Some(kid),
        extra: Map::new(),
    };
    let protected = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);

    let mut cek = Zeroizing::new([0u8; CEK_SIZE]);
    rand::rngs::OsRng.fill_bytes(cek.as_mut());
    let mut iv = [0u8; IV_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut iv);

    let encrypted_key = key_management.wrap(&public_key, cek.as_ref())?;

    let cipher = Aes256Gcm::new_from_slice(cek.as_ref())
        .map_err(|e| Error::encryption(format!("Failed to create cipher: {}", e)))?;
    let mut sealed = cipher
        .encrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: plaintext,
                aad: protected.as_bytes(),
            },
        )
        .map_err(|e| Error::encryption(format!("AES-GCM encryption failed: {}", e)))?;
    let tag = sealed.split_off(sealed.len() - TAG_SIZE);

    Ok(format!(
        "{}.{}.{}.{}.{}",
        protected,
        URL_SAFE_NO_PAD.encode(encrypted_key),
        URL_SAFE_NO_PAD.encode(iv),
        URL_SAFE_NO_PAD.encode(&sealed),
        URL_SAFE_NO_PAD.encode(tag)
    ))
}

/// Read the protected header of a compact token without decrypting it
pub fn decode_header(token: &str) -> Result<JweHeader> {
    let protected = token
        .split('.')
        .next()
        .ok_or_else(|| Error::decryption("empty JWE token"))?;
    let bytes = decode_segment(protected, "protected header")?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::decryption(format!("invalid protected header: {}", e)))
}

/// Decrypt a compact token with `key`
///
/// When `expected_kid` is given and the header names a different key, the
/// token is rejected before any key unwrapping.
pub fn decrypt(
    token: &str,
    key: &RsaPrivateKey,
    expected_kid: Option<&str>,
) -> Result<Zeroizing<Vec<u8>>> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 5 {
        return Err(Error::decryption(format!(
            "expected 5 compact segments, got {}",
            segments.len()
        )));
    }

    let header = decode_header(segments[0])?;
    if header.enc != ENC_A256GCM {
        return Err(Error::decryption(format!(
            "unsupported content encryption '{}'",
            header.enc
        )));
    }
    if header.extra.contains_key("zip") {
        return Err(Error::decryption("compressed JWE payloads are not supported"));
    }
    let key_management = KeyManagement::from_alg(&header.alg).ok_or_else(|| {
        Error::decryption(format!(
            "unsupported key management algorithm '{}'",
            header.alg
        ))
    })?;
    if let (Some(expected), Some(actual)) = (expected_kid, header.kid.as_deref()) {
        if expected != actual {
            return Err(Error::decryption(format!(
                "key id mismatch: token is for '{}', key is '{}'",
                actual, expected
            )));
        }
    }

    let encrypted_key = decode_segment(segments[1], "encrypted key")?;
    let iv = decode_segment(segments[2], "initialization vector")?;
    let mut sealed = decode_segment(segments[3], "ciphertext")?;
    let tag = decode_segment(segments[4], "authentication tag")?;

    if iv.len() != IV_SIZE {
        return Err(Error::decryption(format!(
            "invalid IV size: expected {}, got {}",
            IV_SIZE,
            iv.len()
        )));
    }
    if tag.len() != TAG_SIZE {
        return Err(Error::decryption(format!(
            "invalid tag size: expected {}, got {}",
            TAG_SIZE,
            tag.len()
        )));
    }

    let cek = key_management.unwrap(key, &encrypted_key)?;
    if cek.len() != CEK_SIZE {
        return Err(Error::decryption(format!(
            "content key has wrong size: expected {}, got {}",
            CEK_SIZE,
            cek.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(cek.as_ref())
        .map_err(|e| Error::decryption(format!("Failed to create cipher: {}", e)))?;
    sealed.extend_from_slice(&tag);
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: &sealed,
                aad: segments[0].as_bytes(),
            },
        )
        .map_err(|_| Error::decryption("authentication failed: corrupted token or wrong key"))?;

    Ok(Zeroizing::new(plaintext))
}

fn decode_segment(segment: &str, what: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| Error::decryption(format!("{} is not base64url: {}", what, e)))
}
