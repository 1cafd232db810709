//! Shared-key decryption of the bucket URL and supporter names.
//!
//! The key is a raw AES-256 key, base64url encoded (43 characters, or 44
//! with a trailing `=`). Ciphertexts are AES-256-GCM with a 96-bit IV; the
//! `data` field is ciphertext followed by the 16-byte tag, both base64url.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::errors::{OverlayError, Result};

const KEY_BYTES: usize = 32;
const IV_BYTES: usize = 12;

/// `{ iv, data }` pair as stored in the overlay file and the bucket payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    pub iv: String,
    pub data: String,
}

/// Imported symmetric key.
#[derive(Clone)]
pub struct AccessKey {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessKey(..)")
    }
}

impl AccessKey {
    /// Import a base64url key. Anything other than 43–44 base64url
    /// characters decoding to 32 bytes is rejected.
    pub fn import(encoded: &str) -> Result<Self> {
        if !(43..=44).contains(&encoded.len()) || !is_base64url(encoded) {
            return Err(OverlayError::InvalidKey);
        }
        let bytes = decode(encoded).map_err(|_| OverlayError::InvalidKey)?;
        if bytes.len() != KEY_BYTES {
            return Err(OverlayError::InvalidKey);
        }
        let cipher = Aes256Gcm::new_from_slice(&bytes).map_err(|_| OverlayError::InvalidKey)?;
        Ok(Self { cipher })
    }

    /// Read and import the `key` query parameter of the overlay URL.
    pub fn from_overlay_url(overlay_url: &str) -> Result<Self> {
        let url = reqwest::Url::parse(overlay_url)
            .map_err(|e| OverlayError::Config(format!("Invalid OVERLAY_URL: {e}")))?;
        let key = url
            .query_pairs()
            .find(|(name, _)| name == "key")
            .map(|(_, value)| value.into_owned())
            .ok_or(OverlayError::InvalidKey)?;
        Self::import(&key)
    }

    pub fn decrypt(&self, blob: &EncryptedBlob) -> Result<String> {
        let iv = decode(&blob.iv).map_err(|e| OverlayError::Decrypt(format!("iv: {e}")))?;
        if iv.len() != IV_BYTES {
            return Err(OverlayError::Decrypt(format!(
                "iv must be {IV_BYTES} bytes, got {}",
                iv.len()
            )));
        }
        let data = decode(&blob.data).map_err(|e| OverlayError::Decrypt(format!("data: {e}")))?;

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&iv), data.as_ref())
            .map_err(|_| OverlayError::Decrypt("authentication failed".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| OverlayError::Decrypt("plaintext is not UTF-8".to_string()))
    }
}

fn is_base64url(s: &str) -> bool {
    let body = s.strip_suffix('=').unwrap_or(s);
    body.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn decode(s: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s.trim_end_matches('='))
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
