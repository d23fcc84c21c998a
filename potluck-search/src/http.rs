//! Shared HTTP client for upstream source requests.
//!
//! One [`reqwest::Client`] is built per configuration and cloned into every
//! source, so all sources share a connection pool.

use std::time::Duration;

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// User-Agent sent when the configuration does not override it.
pub fn default_user_agent() -> String {
    format!("potluck/{}", env!("CARGO_PKG_VERSION"))
}

/// Build a [`reqwest::Client`] configured for upstream requests.
///
/// The client has:
/// - Timeout from config
/// - Custom User-Agent if configured, otherwise [`default_user_agent`]
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => default_user_agent(),
    };

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}

/// GET `url` and decode the body as JSON.
///
/// # Errors
///
/// Returns [`SearchError::Upstream`] naming `source` if the request fails or
/// times out, the status is not 2xx, or the body is not JSON.
pub async fn fetch_json(
    client: &reqwest::Client,
    source: &str,
    url: &str,
) -> Result<Value, SearchError> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SearchError::upstream(source, "request timed out")
        } else {
            SearchError::upstream(source, format!("request failed: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::upstream(source, format!("HTTP {status}")));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| SearchError::upstream(source, format!("invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_agent_names_crate_version() {
        let ua = default_user_agent();
        assert!(ua.starts_with("potluck/"));
        assert!(ua.ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn build_client_with_default_config() {
        let client = build_client(&SearchConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn build_client_with_custom_ua() {
        let config = SearchConfig {
            user_agent: Some("RecipeBot/1.0".into()),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_upstream_error() {
        let client = build_client(&SearchConfig {
            timeout_seconds: 1,
            ..Default::default()
        })
        .expect("client");
        let err = fetch_json(&client, "nowhere", "http://127.0.0.1:9/recipes")
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Upstream(_)));
        assert!(err.to_string().contains("nowhere"));
    }
}
