//! Secret encryption for values kept in configuration.
//!
//! Responsibilities:
//! - Provide AES-256-GCM encryption and decryption.
//! - Handle key derivation using Argon2id.
//! - Encrypt strings under the `SECRET_CRYPT_SEED` passphrase into a
//!   self-contained base64 payload.
//!
//! Does NOT handle:
//! - Storing payloads anywhere (callers keep them in env vars or files).
//!
//! Invariants:
//! - Payload layout is `base64(salt[16] || nonce[12] || ciphertext+tag)`.
//! - Every encryption draws a fresh salt and nonce, so equal plaintexts
//!   produce different payloads.
//! - Error messages never include plaintext or key material.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::Argon2;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::constants::SECRET_CRYPT_SEED_VAR;
use crate::loader::env_var_or_none;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

/// Errors that can occur during encryption operations.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Missing encryption seed: set SECRET_CRYPT_SEED")]
    MissingSeed,

    #[error("Encrypted payload is too short: expected at least {expected} bytes, got {actual}")]
    MalformedPayload { expected: usize, actual: usize },

    #[error("Invalid nonce size: expected 12 bytes")]
    InvalidNonceSize,

    #[error("Decrypted value is not valid UTF-8")]
    InvalidUtf8,

    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, EncryptionError>;

/// Core cryptographic logic for AES-256-GCM.
pub struct Encryptor;

impl Encryptor {
    /// Encrypts data using AES-256-GCM.
    /// Returns (ciphertext + tag, nonce).
    pub fn encrypt(data: &[u8], key: &[u8; 32]) -> Result<(Vec<u8>, [u8; NONCE_LEN])> {
        let cipher = Aes256Gcm::new(key.into());
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, data)
            .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

        Ok((ciphertext, nonce_bytes))
    }

    /// Decrypts data using AES-256-GCM.
    pub fn decrypt(ciphertext: &[u8], key: &[u8; 32], nonce: &[u8]) -> Result<Vec<u8>> {
        if nonce.len() != NONCE_LEN {
            return Err(EncryptionError::InvalidNonceSize);
        }
        let cipher = Aes256Gcm::new(key.into());

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| EncryptionError::DecryptionFailed(e.to_string()))
    }

    /// Derives a 32-byte key from a password and salt using Argon2id.
    pub fn derive_key(password: &SecretString, salt: &[u8]) -> Result<[u8; 32]> {
        let argon2 = Argon2::default();
        let mut key = [0u8; 32];
        argon2
            .hash_password_into(password.expose_secret().as_bytes(), salt, &mut key)
            .map_err(|e| EncryptionError::KeyDerivationFailed(e.to_string()))?;
        Ok(key)
    }

    /// Generates a random 16-byte salt for key derivation.
    pub fn generate_salt() -> [u8; SALT_LEN] {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill(&mut salt);
        salt
    }
}

/// Passphrase-based string cipher.
///
/// ```
/// use secrecy::SecretString;
/// use utilkit_config::SecretCipher;
///
/// let cipher = SecretCipher::new(SecretString::from("correct horse"));
/// let payload = cipher.encrypt("db-password").unwrap();
/// assert_eq!(cipher.decrypt(&payload).unwrap(), "db-password");
/// ```
pub struct SecretCipher {
    seed: SecretString,
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher")
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

impl SecretCipher {
    pub fn new(seed: SecretString) -> Self {
        Self { seed }
    }

    /// Build a cipher from the `SECRET_CRYPT_SEED` environment variable.
    pub fn from_env() -> Result<Self> {
        env_var_or_none(SECRET_CRYPT_SEED_VAR)
            .map(|seed| Self::new(SecretString::from(seed)))
            .ok_or(EncryptionError::MissingSeed)
    }

    /// Encrypt `plaintext` into a base64 payload.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let salt = Encryptor::generate_salt();
        let key = Encryptor::derive_key(&self.seed, &salt)?;
        let (ciphertext, nonce) = Encryptor::encrypt(plaintext.as_bytes(), &key)?;

        let mut payload = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&salt);
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(base64_encode(&payload))
    }

    /// Decrypt a payload produced by [`SecretCipher::encrypt`].
    pub fn decrypt(&self, payload: &str) -> Result<String> {
        let bytes = base64_decode(payload.trim())?;
        let header = SALT_LEN + NONCE_LEN;
        // GCM appends a 16-byte tag even to empty plaintexts.
        if bytes.len() < header + 16 {
            return Err(EncryptionError::MalformedPayload {
                expected: header + 16,
                actual: bytes.len(),
            });
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
        let key = Encryptor::derive_key(&self.seed, salt)?;
        let plaintext = Encryptor::decrypt(ciphertext, &key, nonce)?;
        String::from_utf8(plaintext).map_err(|_| EncryptionError::InvalidUtf8)
    }
}

/// Standard base64 with padding.
pub fn base64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base64 with padding.
pub fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(encoded)?)
}
