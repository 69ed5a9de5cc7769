//! Webhook signature verifiers.
//!
//! Two schemes are supported:
//!
//! - [`RsaSha256Verifier`]: RSA PKCS#1 v1.5 over SHA-256, base64 token,
//!   public key as PEM or raw base64 DER
//! - [`HmacSha256Verifier`]: HMAC-SHA256 over the raw body, hex token
//!
//! # Security
//!
//! - Both verifiers work on the raw body bytes, never on re-serialized JSON
//! - HMAC digests are compared in constant time
//! - An RSA verifier without a key rejects everything
//! - An HMAC verifier without a secret follows its [`MissingSecretPolicy`]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Marker that identifies PEM-armoured key material.
const PEM_MARKER: &str = "-----BEGIN";

/// PEM label used by PKCS#1 `RSAPublicKey` documents.
const PKCS1_PEM_LABEL: &str = "BEGIN RSA PUBLIC KEY";

/// Failure to decode configured public key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDecodeError {
    #[error("Public key is empty")]
    Empty,

    #[error("Public key is not valid base64: {0}")]
    Base64(String),

    #[error("Public key is not a valid RSA key: {0}")]
    InvalidKey(String),
}

/// Decode an RSA public key, auto-detecting PEM vs base64 DER.
///
/// PEM input may be SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`).
/// Non-PEM input is base64 DER, tried as SPKI first, then PKCS#1.
pub fn decode_public_key(material: &str) -> Result<RsaPublicKey, KeyDecodeError> {
    let material = material.trim();
    if material.is_empty() {
        return Err(KeyDecodeError::Empty);
    }

    if material.contains(PEM_MARKER) {
        let decoded = if material.contains(PKCS1_PEM_LABEL) {
            RsaPublicKey::from_pkcs1_pem(material).map_err(|e| e.to_string())
        } else {
            RsaPublicKey::from_public_key_pem(material).map_err(|e| e.to_string())
        };
        return decoded.map_err(KeyDecodeError::InvalidKey);
    }

    let compact: String = material.chars().filter(|c| !c.is_whitespace()).collect();
    let der = STANDARD
        .decode(compact)
        .map_err(|e| KeyDecodeError::Base64(e.to_string()))?;

    RsaPublicKey::from_public_key_der(&der)
        .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
        .map_err(|e| KeyDecodeError::InvalidKey(e.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Asymmetric
// ════════════════════════════════════════════════════════════════════════════════

/// RSA-SHA256 (PKCS#1 v1.5) signature verifier.
///
/// Fails closed: without a usable public key every check returns false.
#[derive(Debug, Clone)]
pub struct RsaSha256Verifier {
    provider: &'static str,
    key: Option<VerifyingKey<Sha256>>,
}

impl RsaSha256Verifier {
    /// Builds a verifier from optional configured key material.
    ///
    /// Undecodable material is logged and treated as absent.
    pub fn from_material(provider: &'static str, material: Option<&str>) -> Self {
        let key = material
            .filter(|m| !m.trim().is_empty())
            .and_then(|m| match decode_public_key(m) {
                Ok(key) => Some(VerifyingKey::<Sha256>::new(key)),
                Err(e) => {
                    tracing::error!(provider, error = %e, "Webhook public key could not be decoded");
                    None
                }
            });

        Self { provider, key }
    }

    /// Builds a verifier around an already decoded key.
    pub fn from_key(provider: &'static str, key: RsaPublicKey) -> Self {
        Self {
            provider,
            key: Some(VerifyingKey::<Sha256>::new(key)),
        }
    }

    /// Whether a public key is loaded.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Verify a base64 signature over the raw payload.
    pub fn verify(&self, payload: &[u8], signature_b64: &str) -> bool {
        let Some(key) = &self.key else {
            tracing::warn!(
                provider = self.provider,
                "No webhook public key configured - rejecting signature"
            );
            return false;
        };

        let raw = match STANDARD.decode(signature_b64.trim()) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(provider = self.provider, error = %e, "Signature is not valid base64");
                return false;
            }
        };

        let signature = match Signature::try_from(raw.as_slice()) {
            Ok(signature) => signature,
            Err(e) => {
                tracing::warn!(provider = self.provider, error = %e, "Malformed RSA signature");
                return false;
            }
        };

        let valid = key.verify(payload, &signature).is_ok();
        if !valid {
            tracing::warn!(provider = self.provider, "Invalid webhook signature");
        }
        valid
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Symmetric
// ════════════════════════════════════════════════════════════════════════════════

/// What an HMAC verifier does when no shared secret is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSecretPolicy {
    /// Reject every signature.
    FailClosed,
    /// Accept every signature. Local development only.
    FailOpen,
}

/// HMAC-SHA256 signature verifier with hex-encoded tokens.
#[derive(Debug, Clone)]
pub struct HmacSha256Verifier {
    provider: &'static str,
    secret: Option<SecretString>,
    missing_secret: MissingSecretPolicy,
}

impl HmacSha256Verifier {
    /// Builds a verifier. Empty secrets count as missing.
    pub fn new(
        provider: &'static str,
        secret: Option<SecretString>,
        missing_secret: MissingSecretPolicy,
    ) -> Self {
        let secret = secret.filter(|s| !s.expose_secret().is_empty());
        Self {
            provider,
            secret,
            missing_secret,
        }
    }

    /// Whether a shared secret is loaded.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    pub fn missing_secret_policy(&self) -> MissingSecretPolicy {
        self.missing_secret
    }

    /// Verify a hex signature (either case) over the raw payload.
    pub fn verify(&self, payload: &[u8], signature_hex: &str) -> bool {
        let Some(secret) = &self.secret else {
            return match self.missing_secret {
                MissingSecretPolicy::FailOpen => {
                    tracing::warn!(
                        provider = self.provider,
                        "No webhook secret configured - accepting unverified payload"
                    );
                    true
                }
                MissingSecretPolicy::FailClosed => {
                    tracing::warn!(
                        provider = self.provider,
                        "No webhook secret configured - rejecting signature"
                    );
                    false
                }
            };
        };

        let provided = match hex::decode(signature_hex.trim()) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            _ => {
                tracing::warn!(provider = self.provider, "Signature is not valid hex");
                return false;
            }
        };

        let expected = hmac_sha256(secret.expose_secret().as_bytes(), payload);
        let valid = expected.ct_eq(provided.as_slice()).unwrap_u8() == 1;
        if !valid {
            tracing::warn!(provider = self.provider, "Invalid webhook signature");
        }
        valid
    }
}

/// HMAC-SHA256 digest of `payload` under `key`.
pub fn hmac_sha256(key: &[u8], payload: &[u8]) -> Vec<u8> {
    // Hmac<Sha256> accepts keys of any length.
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return Vec::new(),
    };
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}
