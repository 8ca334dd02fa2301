mod key;
mod store;

pub use key::{TOKEN_PARAMETER, cache_entry_path, path_safe, strip_token};
pub use store::ResponseCache;
