use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;

use crate::error::SignError;

/// Private key astronomer signs reports with, compiled into the binary.
pub const EMBEDDED_KEY_PEM: &str = include_str!("astronomer.pem");

const PEM_LABEL: &str = "RSA PRIVATE KEY";

/// Source of the RSA key used to sign trust reports.
///
/// Implementations are sync and may be called once per signature.
pub trait KeyProvider: Send + Sync {
    fn signing_key(&self) -> Result<RsaPrivateKey, SignError>;
}

/// The key embedded at build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedKey;

impl KeyProvider for EmbeddedKey {
    fn signing_key(&self) -> Result<RsaPrivateKey, SignError> {
        decode_private_key(EMBEDDED_KEY_PEM)
    }
}

/// A key supplied as a PKCS#1 PEM document at runtime.
#[derive(Clone)]
pub struct PemKey {
    pem: String,
}

impl PemKey {
    pub fn new(pem: impl Into<String>) -> Self {
        Self { pem: pem.into() }
    }
}

impl KeyProvider for PemKey {
    fn signing_key(&self) -> Result<RsaPrivateKey, SignError> {
        decode_private_key(&self.pem)
    }
}

/// Decodes exactly one `RSA PRIVATE KEY` PEM block.
///
/// Only the END line's own line ending may follow the block.
pub fn decode_private_key(pem: &str) -> Result<RsaPrivateKey, SignError> {
    let end_marker = format!("-----END {PEM_LABEL}-----");
    let Some(end) = pem.find(&end_marker) else {
        return Err(SignError::KeyMaterial(format!("no {PEM_LABEL} block found")));
    };

    let (block, rest) = pem.split_at(end + end_marker.len());
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    if !rest.is_empty() {
        return Err(SignError::KeyMaterial(format!(
            "{} unexpected bytes after {PEM_LABEL} block",
            rest.len()
        )));
    }

    RsaPrivateKey::from_pkcs1_pem(block)
        .map_err(|e| SignError::KeyMaterial(format!("invalid PKCS#1 private key: {e}")))
}
