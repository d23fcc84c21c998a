//! Error types for the potluck-search crate.
//!
//! All errors carry plain string messages so a single failure can be
//! cloned and handed to every caller waiting on the same fan-out.

use std::fmt::Display;

/// Errors that can occur while resolving a recipe search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// An upstream source failed: the request errored, returned a
    /// non-success status, or its payload lacked the mapped fields.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Build an [`SearchError::Upstream`] prefixed with the source name.
    pub fn upstream(source: &str, reason: impl Display) -> Self {
        Self::Upstream(format!("{source}: {reason}"))
    }

    /// The message without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Upstream(detail) | Self::Config(detail) => detail,
        }
    }
}

/// Convenience type alias for potluck-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_upstream() {
        let err = SearchError::Upstream("source_a: HTTP 503".into());
        assert_eq!(err.to_string(), "upstream error: source_a: HTTP 503");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("at least one source must be configured".into());
        assert_eq!(
            err.to_string(),
            "config error: at least one source must be configured"
        );
    }

    #[test]
    fn upstream_helper_prefixes_source() {
        let err = SearchError::upstream("source_b", "connection refused");
        assert_eq!(err, SearchError::Upstream("source_b: connection refused".into()));
        assert_eq!(err.detail(), "source_b: connection refused");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
