//! Responders that behave like the vault's crypto
//!
//! The vault decrypts an uploaded `secret_jwe` with its own private key and,
//! on reveal, re-encrypts the stored plaintext to the caller's public key.

use super::constants::*;
use pamvault_secrets::jose;
use pamvault_secrets::{EphemeralKeyPair, Jwk, KeyManagement};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// The vault's key pair and the plaintext it currently stores
#[derive(Clone)]
pub struct FakeVault {
    key: Arc<EphemeralKeyPair>,
    alg: KeyManagement,
    stored: Arc<Mutex<Option<Vec<u8>>>>,
}

impl FakeVault {
    pub fn new(alg: KeyManagement) -> Self {
        Self {
            key: Arc::new(EphemeralKeyPair::generate().unwrap()),
            alg,
            stored: Arc::new(Mutex::new(None)),
        }
    }

    /// Public key as published in the JWKS, with `alg` and kid `K1`
    pub fn public_jwk(&self) -> Jwk {
        Jwk::from_rsa_public_key(&self.key.private_key().to_public_key(), SERVER_KID)
            .with_alg(self.alg)
    }

    /// Decrypt a token addressed to the vault
    pub fn open(&self, token: &str) -> Vec<u8> {
        jose::decrypt(token, self.key.private_key(), Some(SERVER_KID))
            .unwrap()
            .to_vec()
    }

    pub fn store(&self, plaintext: &[u8]) {
        *self.stored.lock().unwrap() = Some(plaintext.to_vec());
    }

    pub fn stored(&self) -> Option<Vec<u8>> {
        self.stored.lock().unwrap().clone()
    }

    /// Mount create and reveal endpoints for secret `id`
    pub async fn mount(&self, server: &MockServer, id: &str) {
        Mock::given(method("POST"))
            .and(path(SECRETS_PATH))
            .respond_with(StoreSecret {
                vault: self.clone(),
                id: id.to_string(),
            })
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path(secret_path(id)))
            .respond_with(RevealSecret {
                vault: self.clone(),
            })
            .mount(server)
            .await;
    }
}

/// Decrypts the uploaded secret and answers `201 {id}`
pub struct StoreSecret {
    vault: FakeVault,
    id: String,
}

impl Respond for StoreSecret {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let token = body["secret_jwe"].as_str().unwrap();
        let plaintext = self.vault.open(token);
        self.vault.store(&plaintext);
        ResponseTemplate::new(201).set_body_json(json!({
            "id": self.id,
            "name": body["name"],
            "parent_folder_id": body["parent_folder_id"],
        }))
    }
}

/// Re-encrypts the stored plaintext to the request's `public_key`
pub struct RevealSecret {
    vault: FakeVault,
}

impl Respond for RevealSecret {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let Some(plaintext) = self.vault.stored() else {
            return ResponseTemplate::new(404).set_body_string("secret not found");
        };
        let public_key = Jwk::from_value(body["public_key"].clone())
            .unwrap()
            .with_alg(KeyManagement::RsaOaep256);
        let secret_jwe = jose::encrypt(&plaintext, &public_key).unwrap();
        ResponseTemplate::new(200).set_body_json(json!({ "secret_jwe": secret_jwe }))
    }
}
