//! Request path signing
//!
//! Signed paths carry the signature as their first segment:
//!
//! ```text
//! /<signature>/rs:fill:300:200/plain/https://example.com/img.jpg
//! ```
//!
//! The signature is computed as:
//! ```text
//! signature = base64url(HMAC-SHA256(key, salt + path)[..signature_size])
//! ```
//!
//! where `path` is everything after the signature segment, leading slash
//! included. Several key/salt pairs may be configured to allow rotation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::SecurityConfig;
use crate::constants::DEFAULT_SIGNATURE_SIZE;
use crate::error::RequestError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
struct SigningPair {
    key: Vec<u8>,
    salt: Vec<u8>,
}

/// Verifies path signatures against every configured key/salt pair
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier {
    pairs: Vec<SigningPair>,
    signature_size: usize,
}

impl SignatureVerifier {
    /// Decode the hex keys and salts from configuration.
    ///
    /// Keys and salts are paired by position; extra entries on either side
    /// are an error. The signature size must be within `1..=32` bytes.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, String> {
        if config.signature_size == 0 || config.signature_size > DEFAULT_SIGNATURE_SIZE {
            return Err(format!(
                "Signature size must be between 1 and {}, got {}",
                DEFAULT_SIGNATURE_SIZE, config.signature_size
            ));
        }

        if config.keys.len() != config.salts.len() {
            return Err(format!(
                "Number of keys ({}) and salts ({}) must match",
                config.keys.len(),
                config.salts.len()
            ));
        }

        let pairs = config
            .keys
            .iter()
            .zip(&config.salts)
            .enumerate()
            .map(|(idx, (key, salt))| {
                Ok(SigningPair {
                    key: hex::decode(key)
                        .map_err(|e| format!("Invalid key at index {}: {}", idx, e))?,
                    salt: hex::decode(salt)
                        .map_err(|e| format!("Invalid salt at index {}: {}", idx, e))?,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self {
            pairs,
            signature_size: config.signature_size,
        })
    }

    /// Whether any key is configured
    pub fn is_enabled(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Check `signature` for `path`.
    ///
    /// With no keys configured every signature is accepted.
    pub fn verify(&self, signature: &str, path: &str) -> Result<(), RequestError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let provided = URL_SAFE_NO_PAD
            .decode(signature.trim_end_matches('='))
            .map_err(|_| RequestError::invalid_signature("signature is not valid base64url"))?;

        let matched = self.pairs.iter().any(|pair| {
            compute_hmac_signature(&pair.key, &pair.salt, path)
                .map(|expected| {
                    constant_time_compare(&provided, truncate(&expected, self.signature_size))
                })
                .unwrap_or(false)
        });

        if matched {
            Ok(())
        } else {
            tracing::debug!(path = %path, "Path signature does not match any key");
            Err(RequestError::invalid_signature("signature mismatch"))
        }
    }

    /// Sign `path` with the first configured pair
    pub fn sign(&self, path: &str) -> Option<String> {
        let pair = self.pairs.first()?;
        let signature = compute_hmac_signature(&pair.key, &pair.salt, path)?;
        Some(URL_SAFE_NO_PAD.encode(truncate(&signature, self.signature_size)))
    }
}

/// HMAC-SHA256 over salt followed by path
fn compute_hmac_signature(key: &[u8], salt: &[u8], path: &str) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(salt);
    mac.update(path.as_bytes());
    Some(mac.finalize().into_bytes().to_vec())
}

fn truncate(digest: &[u8], size: usize) -> &[u8] {
    &digest[..size.min(digest.len())]
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b) {
        result |= x ^ y;
    }
    result == 0
}
