use std::sync::Arc;

use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::rand_core::OsRng;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use serde::Serialize;
use sha2::{Digest, Sha512};
use tracing::debug;

use super::provider::{EmbeddedKey, KeyProvider};
use crate::error::SignError;

pub const ALGORITHM: &str = "rsa-pkcs1v15-sha512";

/// Signs trust reports with RSA PKCS#1 v1.5 over a SHA-512 digest.
///
/// The key is fetched from the provider on every call, so a corrupt key
/// surfaces as an error from `sign` rather than at construction.
#[derive(Clone)]
pub struct ReportSigner {
    keys: Arc<dyn KeyProvider>,
}

impl Default for ReportSigner {
    fn default() -> Self {
        Self::new(EmbeddedKey)
    }
}

impl ReportSigner {
    pub fn new(keys: impl KeyProvider + 'static) -> Self {
        Self { keys: Arc::new(keys) }
    }

    /// Signs the canonical JSON form of `report`.
    ///
    /// Equal reports produce equal signatures under the same key.
    pub fn sign<R: Serialize + ?Sized>(&self, report: &R) -> Result<Vec<u8>, SignError> {
        let data = canonical_bytes(report)?;
        let digest = Sha512::digest(&data);
        debug!(digest = %hex::encode(&digest[..8]), bytes = data.len(), "signing trust report");

        let key = self.keys.signing_key()?;
        // The RNG only blinds the private-key operation; output is unaffected.
        key.sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha512>(), &digest)
            .map_err(SignError::Signing)
    }

    pub fn public_key(&self) -> Result<RsaPublicKey, SignError> {
        Ok(self.keys.signing_key()?.to_public_key())
    }

    /// SPKI PEM of the public half, as handed to the verifier.
    pub fn public_key_pem(&self) -> Result<String, SignError> {
        self.public_key()?
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| SignError::KeyMaterial(format!("encoding public key: {e}")))
    }

    pub fn algorithm(&self) -> &str {
        ALGORITHM
    }
}

/// The exact bytes a report's signature covers.
pub fn canonical_bytes<R: Serialize + ?Sized>(report: &R) -> Result<Vec<u8>, SignError> {
    serde_json::to_vec(report).map_err(SignError::Serialization)
}

/// Checks `signature` against the canonical form of `report`.
pub fn verify<R: Serialize + ?Sized>(
    public_key: &RsaPublicKey,
    report: &R,
    signature: &[u8],
) -> Result<(), SignError> {
    verify_bytes(public_key, &canonical_bytes(report)?, signature)
}

/// Checks `signature` against already serialized report bytes.
pub fn verify_bytes(
    public_key: &RsaPublicKey,
    data: &[u8],
    signature: &[u8],
) -> Result<(), SignError> {
    let digest = Sha512::digest(data);
    public_key
        .verify(Pkcs1v15Sign::new::<Sha512>(), &digest, signature)
        .map_err(SignError::Verification)
}
