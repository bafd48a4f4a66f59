//! Single-use RSA key pairs for receiving a secret

use super::jwe;
use super::jwk::Jwk;
use crate::naming;
use pamvault_core::{Error, Result};
use rsa::RsaPrivateKey;
use tracing::debug;
use zeroize::Zeroizing;

/// Modulus size of reveal key pairs
pub const EPHEMERAL_KEY_BITS: usize = 2048;

/// A freshly generated RSA key pair with a random key id
///
/// Only the public half ever leaves the process. The private key is dropped
/// with the pair.
pub struct EphemeralKeyPair {
    kid: String,
    private_key: RsaPrivateKey,
}

impl EphemeralKeyPair {
    /// Generate a 2048-bit key pair
    pub fn generate() -> Result<Self> {
        let kid = naming::random_name();
        let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, EPHEMERAL_KEY_BITS)
            .map_err(|e| Error::invalid_key(format!("RSA key generation failed: {}", e)))?;
        debug!(kid = %kid, "Generated ephemeral key pair");
        Ok(Self { kid, private_key })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Public JWK (`kty`, `kid`, `n`, `e`)
    pub fn public_jwk(&self) -> Jwk {
        Jwk::from_rsa_public_key(&self.private_key.to_public_key(), self.kid.clone())
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// Decrypt a token addressed to this key pair
    pub fn decrypt(&self, token: &str) -> Result<Zeroizing<Vec<u8>>> {
        jwe::decrypt(token, &self.private_key, Some(&self.kid))
    }
}

impl std::fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralKeyPair")
            .field("kid", &self.kid)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
