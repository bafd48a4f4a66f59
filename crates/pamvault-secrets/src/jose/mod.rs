//! JOSE envelope encryption
//!
//! Secrets travel to and from the vault as compact JWE tokens: a random
//! AES-256-GCM content key encrypts the payload and is itself wrapped with
//! the recipient's RSA public key (RSA-OAEP or RSA-OAEP-256).

pub mod ephemeral;
pub mod jwe;
pub mod jwk;

pub use ephemeral::{EphemeralKeyPair, EPHEMERAL_KEY_BITS};
pub use jwe::{decode_header, decrypt, encrypt, JweHeader, ENC_A256GCM};
pub use jwk::{Jwk, KeyManagement};
