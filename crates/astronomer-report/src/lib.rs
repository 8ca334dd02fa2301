pub mod cache;
pub mod context;
pub mod error;
pub mod signing;
pub mod transmit;

pub use cache::{ResponseCache, cache_entry_path};
pub use context::Context;
pub use error::{CacheError, SignError, SubmitError};
pub use signing::{EmbeddedKey, KeyProvider, PemKey, ReportSigner};
pub use transmit::{DEFAULT_ENDPOINT, ENVELOPE_FIELDS, ReportTransmitter, SUCCESS_STATUS, SignedReport};
