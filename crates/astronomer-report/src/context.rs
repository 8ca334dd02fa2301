use std::fmt;

use anyhow::{Result, bail};

/// Repository identity and credentials shared by every operation.
#[derive(Clone, PartialEq, Eq)]
pub struct Context {
    pub repo_owner: String,
    pub repo_name: String,
    pub github_token: String,
    pub cache_directory_path: String,
}

impl Context {
    pub fn new(
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
        github_token: impl Into<String>,
        cache_directory_path: impl Into<String>,
    ) -> Self {
        Self {
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            github_token: github_token.into(),
            cache_directory_path: cache_directory_path.into(),
        }
    }

    /// Builds a context from an `owner/name` repository slug.
    pub fn from_repository(
        repository: &str,
        github_token: impl Into<String>,
        cache_directory_path: impl Into<String>,
    ) -> Result<Self> {
        let Some((owner, name)) = repository.split_once('/') else {
            bail!("repository must be of the form owner/name, got {repository:?}");
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("repository must be of the form owner/name, got {repository:?}");
        }
        Ok(Self::new(owner, name, github_token, cache_directory_path))
    }
}

// The token must never reach logs.
impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("repo_owner", &self.repo_owner)
            .field("repo_name", &self.repo_name)
            .field("github_token", &"<redacted>")
            .field("cache_directory_path", &self.cache_directory_path)
            .finish()
    }
}
