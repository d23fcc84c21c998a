//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] declares which upstream sources are queried (and in what
//! order their records appear), how each source's payload maps onto a
//! [`crate::Recipe`], and how long merged results stay cached.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Placeholder in a source address template that is replaced by the
/// percent-encoded query term.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Longest accepted cache TTL: 100 years.
pub const MAX_CACHE_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

/// How one source's payload maps onto the canonical recipe shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field of the top-level object holding the record array.
    /// `None` means the payload itself is the array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<String>,
    /// Record field copied into `Recipe::name`.
    pub name: String,
    /// Record field copied into `Recipe::servings`.
    pub servings: String,
}

impl FieldMapping {
    pub fn new(records: Option<&str>, name: &str, servings: &str) -> Self {
        Self {
            records: records.map(str::to_owned),
            name: name.to_owned(),
            servings: servings.to_owned(),
        }
    }
}

/// One upstream recipe source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Name used in logs and error messages. Must be unique.
    pub name: String,
    /// Address template; `{query}` is replaced by the encoded term.
    pub url_template: String,
    pub mapping: FieldMapping,
}

impl SourceConfig {
    /// Render the request address for `term`.
    pub fn url_for(&self, term: &str) -> String {
        self.url_template
            .replace(QUERY_PLACEHOLDER, &urlencoding::encode(term))
    }
}

/// One advice quote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSourceConfig {
    pub name: String,
    pub url: String,
    /// Payload field holding the quote id. Falls back to the source name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    /// Payload field holding the quote text.
    pub quote_field: String,
}

/// The pair of quote services queried together by [`crate::advice::fetch_advice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub kanye: QuoteSourceConfig,
    pub chuck_norris: QuoteSourceConfig,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            kanye: QuoteSourceConfig {
                name: "kanye".into(),
                url: "https://api.kanye.rest/".into(),
                id_field: None,
                quote_field: "quote".into(),
            },
            chuck_norris: QuoteSourceConfig {
                name: "chuck_norris".into(),
                url: "https://api.chucknorris.io/jokes/random".into(),
                id_field: Some("id".into()),
                quote_field: "value".into(),
            },
        }
    }
}

/// Configuration for recipe resolution.
///
/// Use [`Default::default()`] for the built-in sources, or construct with
/// field overrides. Every field is optional when deserialising.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How long merged results stay fresh, in seconds. 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Upper bound on cached query terms.
    pub max_cache_entries: u64,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent. Defaults to `potluck/<version>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Upstream recipe sources. Declaration order is result order.
    pub sources: Vec<SourceConfig>,
    pub advice: AdviceConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 600,
            max_cache_entries: 1000,
            timeout_seconds: 8,
            user_agent: None,
            sources: vec![
                SourceConfig {
                    name: "source_a".into(),
                    url_template: "https://api.kanye.rest/?keyword={query}".into(),
                    mapping: FieldMapping::new(Some("recipes"), "recipeName", "yield"),
                },
                SourceConfig {
                    name: "source_b".into(),
                    url_template: "https://api.chucknorris.io/jokes/random".into(),
                    mapping: FieldMapping::new(Some("recipes"), "name", "servings"),
                },
            ],
            advice: AdviceConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Cache time-to-live as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - at least one source, with unique non-empty names
    /// - every address template renders to a parseable URL
    /// - mapping field names are non-empty
    /// - `timeout_seconds` and `max_cache_entries` are greater than 0
    /// - `cache_ttl_seconds` is at most [`MAX_CACHE_TTL_SECONDS`]
    /// - both advice services have parseable URLs and a quote field
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.sources.is_empty() {
            return Err(SearchError::Config(
                "at least one source must be configured".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_cache_entries == 0 {
            return Err(SearchError::Config(
                "max_cache_entries must be greater than 0".into(),
            ));
        }
        if self.cache_ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(SearchError::Config(format!(
                "cache_ttl_seconds must be at most {MAX_CACHE_TTL_SECONDS} (100 years)"
            )));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(SearchError::Config("source name must not be empty".into()));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(SearchError::Config(format!(
                    "duplicate source name `{}`",
                    source.name
                )));
            }
            url::Url::parse(&source.url_for("term")).map_err(|e| {
                SearchError::Config(format!(
                    "source `{}` has an invalid url_template: {e}",
                    source.name
                ))
            })?;
            validate_mapping(&source.name, &source.mapping)?;
        }

        for quote in [&self.advice.kanye, &self.advice.chuck_norris] {
            url::Url::parse(&quote.url).map_err(|e| {
                SearchError::Config(format!(
                    "advice source `{}` has an invalid url: {e}",
                    quote.name
                ))
            })?;
            if quote.quote_field.is_empty() {
                return Err(SearchError::Config(format!(
                    "advice source `{}` needs a quote_field",
                    quote.name
                )));
            }
        }
        Ok(())
    }
}

fn validate_mapping(source: &str, mapping: &FieldMapping) -> Result<(), SearchError> {
    let records_empty = mapping.records.as_deref().is_some_and(str::is_empty);
    if records_empty || mapping.name.is_empty() || mapping.servings.is_empty() {
        return Err(SearchError::Config(format!(
            "source `{source}` has an empty mapping field"
        )));
    }
    Ok(())
}
