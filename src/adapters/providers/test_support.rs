//! Shared fixtures for provider tests: an RSA key pair, signing helpers and
//! a throwaway HTTP stub for upstream rate endpoints.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::signature::hmac_sha256;

/// One key pair per test binary; generation is slow in debug builds.
pub static TEST_KEYS: Lazy<(RsaPrivateKey, RsaPublicKey)> = Lazy::new(|| {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, 1024).expect("generate RSA key");
    let public = RsaPublicKey::from(&private);
    (private, public)
});

/// Base64 RSA-SHA256 signature with the test private key.
pub fn rsa_sign(payload: &[u8]) -> String {
    let signing_key = SigningKey::<Sha256>::new(TEST_KEYS.0.clone());
    STANDARD.encode(signing_key.sign(payload).to_bytes())
}

pub fn public_key_pem() -> String {
    TEST_KEYS
        .1
        .to_public_key_pem(LineEnding::LF)
        .expect("encode SPKI PEM")
}

pub fn public_key_pkcs1_pem() -> String {
    TEST_KEYS
        .1
        .to_pkcs1_pem(LineEnding::LF)
        .expect("encode PKCS#1 PEM")
}

pub fn public_key_der_b64() -> String {
    let der = TEST_KEYS.1.to_public_key_der().expect("encode SPKI DER");
    STANDARD.encode(der.as_bytes())
}

/// Lower-case hex HMAC-SHA256 signature.
pub fn hmac_sign(secret: &str, payload: &[u8]) -> String {
    hex::encode(hmac_sha256(secret.as_bytes(), payload))
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{}", addr)
}
