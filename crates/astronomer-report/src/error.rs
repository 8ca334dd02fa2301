use reqwest::StatusCode;

/// Failures while turning a report into a signature.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("unable to marshal trust report: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("unable to decode private key: {0}")]
    KeyMaterial(String),
    #[error("unable to sign trust report: {0}")]
    Signing(#[source] rsa::Error),
    #[error("signature does not match trust report")]
    Verification(#[source] rsa::Error),
}

/// Failures while submitting a signed report to the astronomer server.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("unable to sign report before sending: {0}")]
    Sign(#[from] SignError),
    #[error("unable to marshal signed report: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("unable to send signed report to astronomer server: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("astronomer server did not trust this report: {}", status_text(.status))]
    Rejected { status: StatusCode },
}

// Unregistered codes have no reason phrase; show the bare number.
fn status_text(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

impl SubmitError {
    /// Whether retrying the same submission could succeed.
    ///
    /// Only transport failures qualify. A rejection is a trust decision.
    pub fn is_transient(&self) -> bool {
        matches!(self, SubmitError::Transport(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("unable to access cache entry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_reports_status_text() {
        let error = SubmitError::Rejected { status: StatusCode::FORBIDDEN };
        assert_eq!(
            error.to_string(),
            "astronomer server did not trust this report: 403 Forbidden"
        );
    }

    #[test]
    fn rejection_with_unregistered_status_shows_the_code() {
        let status = StatusCode::from_u16(299).unwrap();
        let error = SubmitError::Rejected { status };
        assert_eq!(error.to_string(), "astronomer server did not trust this report: 299");
    }

    #[test]
    fn rejection_is_not_transient() {
        let error = SubmitError::Rejected { status: StatusCode::OK };
        assert!(!error.is_transient());
    }

    #[test]
    fn sign_error_keeps_stage_tag() {
        let error: SubmitError = SignError::KeyMaterial("missing armor".into()).into();
        assert_eq!(
            error.to_string(),
            "unable to sign report before sending: unable to decode private key: missing armor"
        );
        assert!(!error.is_transient());
    }

    #[test]
    fn cache_error_names_the_path() {
        let error = CacheError::Io {
            path: "data/a/b/c".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(error.to_string().starts_with("unable to access cache entry data/a/b/c"));
    }
}
