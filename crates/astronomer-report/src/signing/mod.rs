mod provider;
mod rsa;

pub use provider::{EMBEDDED_KEY_PEM, EmbeddedKey, KeyProvider, PemKey, decode_private_key};
pub use self::rsa::{ALGORITHM, ReportSigner, canonical_bytes, verify, verify_bytes};
