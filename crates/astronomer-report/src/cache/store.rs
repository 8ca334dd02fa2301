use std::io::ErrorKind;
use std::path::Path;

use tracing::trace;

use super::key::cache_entry_path;
use crate::context::Context;
use crate::error::CacheError;

/// File-backed cache of API responses, one file per request URL.
///
/// Entries never expire; clearing the directory is up to the caller.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    context: Context,
}

impl ResponseCache {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    pub fn entry_path(&self, request_url: &str) -> String {
        cache_entry_path(&self.context, request_url)
    }

    /// Reads the cached response for `request_url`, if there is one.
    pub async fn load(&self, request_url: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(request_url);
        match tokio::fs::read(&path).await {
            Ok(body) => {
                trace!(%path, "cache hit");
                Ok(Some(body))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                trace!(%path, "cache miss");
                Ok(None)
            }
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    /// Writes `body` as the cached response for `request_url`.
    pub async fn store(&self, request_url: &str, body: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(request_url);
        if let Some(parent) = Path::new(&path).parent() {
            if let Err(source) = tokio::fs::create_dir_all(parent).await {
                return Err(CacheError::Io { path, source });
            }
        }
        if let Err(source) = tokio::fs::write(&path, body).await {
            return Err(CacheError::Io { path, source });
        }
        trace!(%path, bytes = body.len(), "cache entry written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://api.github.com/graphql?access_token=s3cr3t&after=42";

    fn cache_in(dir: &Path) -> ResponseCache {
        let dir = dir.to_str().unwrap();
        ResponseCache::new(Context::new("ullaakut", "astronomer", "s3cr3t", dir))
    }

    #[tokio::test]
    async fn missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        assert_eq!(cache.load(URL).await.unwrap(), None);
    }

    #[tokio::test]
    async fn stored_entry_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());

        cache.store(URL, br#"{"data":{}}"#).await.unwrap();
        assert_eq!(cache.load(URL).await.unwrap().as_deref(), Some(&br#"{"data":{}}"#[..]));

        let expected = dir
            .path()
            .join("ullaakut/astronomer/https-api-github-com-graphql-after-42");
        assert!(expected.is_file());
    }

    #[tokio::test]
    async fn store_overwrites_existing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());

        cache.store(URL, b"first").await.unwrap();
        cache.store(URL, b"second").await.unwrap();
        assert_eq!(cache.load(URL).await.unwrap().as_deref(), Some(&b"second"[..]));
    }

    #[tokio::test]
    async fn unreadable_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        // A directory where the entry file should be.
        std::fs::create_dir_all(cache.entry_path(URL)).unwrap();

        let err = cache.load(URL).await.unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
