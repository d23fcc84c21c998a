//! Fan-out resolver: cache lookup, concurrent source queries, merge.
//!
//! A miss queries every source concurrently and waits for all of them
//! before inspecting any outcome. One failing source fails the whole
//! resolution and nothing is cached. Successful results are concatenated
//! in declared source order, never completion order.

use std::sync::Arc;

use crate::cache::RecipeCache;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::build_client;
use crate::source::RecipeSource;
use crate::sources::HttpSource;
use crate::types::Recipe;

/// Resolves query terms against a fixed, ordered set of sources, memoising
/// merged results in a [`RecipeCache`].
pub struct Aggregator {
    sources: Vec<Arc<dyn RecipeSource>>,
    cache: RecipeCache,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("sources", &self.source_names())
            .field("cache", &self.cache)
            .finish()
    }
}

impl Aggregator {
    /// Build from already-constructed sources. Declaration order is result order.
    pub fn new(sources: Vec<Arc<dyn RecipeSource>>, cache: RecipeCache) -> Self {
        Self { sources, cache }
    }

    /// Build HTTP sources for every configured source, sharing one client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = build_client(config)?;
        Ok(Self::with_client(config, client))
    }

    /// Like [`Aggregator::from_config`] with a caller-supplied client.
    /// The configuration is assumed valid.
    pub fn with_client(config: &SearchConfig, client: reqwest::Client) -> Self {
        let sources = config
            .sources
            .iter()
            .map(|source| {
                Arc::new(HttpSource::new(source.clone(), client.clone())) as Arc<dyn RecipeSource>
            })
            .collect();
        Self::new(sources, RecipeCache::from_config(config))
    }

    pub fn cache(&self) -> &RecipeCache {
        &self.cache
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Resolve `term` to the merged records of every source.
    ///
    /// # Pipeline
    ///
    /// 1. Serve a fresh cache entry if one exists (no upstream calls)
    /// 2. Otherwise fan out to all sources concurrently; concurrent callers
    ///    for the same term share one fan-out
    /// 3. Wait for every source, then fail if any failed
    /// 4. Normalise each payload and concatenate in declared source order
    /// 5. Store the result under `term` with a fresh timestamp
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Upstream`] if any source fails or returns a
    /// payload that does not match its mapping.
    pub async fn resolve(&self, term: &str) -> Result<Vec<Recipe>, SearchError> {
        tracing::trace!(term, "resolving");
        if let Some(hit) = self.cache.get(term).await {
            tracing::debug!(count = hit.len(), "cache hit");
            return Ok(hit.as_ref().clone());
        }

        tracing::debug!(sources = self.sources.len(), "cache miss, fanning out");
        let entry = self
            .cache
            .get_or_populate(term, self.fan_out(term))
            .await?;
        Ok(entry.value.as_ref().clone())
    }

    /// Discard any cached entry for `term`, fan out, and cache the result.
    ///
    /// Always queries every source, even while another caller's fan-out for
    /// the same term is in flight.
    ///
    /// # Errors
    ///
    /// Same as [`Aggregator::resolve`]. On failure the term stays uncached.
    pub async fn refresh(&self, term: &str) -> Result<Vec<Recipe>, SearchError> {
        self.cache.invalidate(term).await;
        tracing::debug!(sources = self.sources.len(), "refresh, fanning out");
        let recipes = self.fan_out(term).await?;
        self.cache.put(term, recipes.clone()).await;
        Ok(recipes)
    }

    /// Query every source concurrently and merge, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Upstream`] listing every failed source, in
    /// declared order, joined with `"; "`.
    pub async fn fan_out(&self, term: &str) -> Result<Vec<Recipe>, SearchError> {
        let futures = self.sources.iter().map(|source| async move {
            let outcome = source.search(term).await;
            (source.name(), outcome)
        });

        let outcomes = futures::future::join_all(futures).await;

        let mut merged: Vec<Recipe> = Vec::new();
        let mut failures: Vec<String> = Vec::new();

        for (source, outcome) in outcomes {
            match outcome {
                Ok(records) => {
                    tracing::debug!(source, count = records.len(), "source returned records");
                    merged.extend(records);
                }
                Err(err) => {
                    tracing::warn!(source, error = %err, "source query failed");
                    failures.push(err.detail().to_owned());
                }
            }
        }

        if !failures.is_empty() {
            return Err(SearchError::Upstream(failures.join("; ")));
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldMapping;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::time::Duration;

    struct StubSource {
        name: &'static str,
        mapping: FieldMapping,
        payload: Result<Value, SearchError>,
    }

    impl StubSource {
        fn ok(name: &'static str, payload: Value) -> Arc<dyn RecipeSource> {
            Arc::new(Self {
                name,
                mapping: FieldMapping::new(Some("recipes"), "name", "servings"),
                payload: Ok(payload),
            })
        }

        fn failing(name: &'static str) -> Arc<dyn RecipeSource> {
            Arc::new(Self {
                name,
                mapping: FieldMapping::new(Some("recipes"), "name", "servings"),
                payload: Err(SearchError::upstream(name, "HTTP 502 Bad Gateway")),
            })
        }
    }

    #[async_trait]
    impl RecipeSource for StubSource {
        fn name(&self) -> &str {
            self.name
        }

        fn mapping(&self) -> &FieldMapping {
            &self.mapping
        }

        async fn fetch(&self, _term: &str) -> Result<Value, SearchError> {
            self.payload.clone()
        }
    }

    fn cache() -> RecipeCache {
        RecipeCache::new(Duration::from_secs(600), 100)
    }

    #[tokio::test]
    async fn fan_out_concatenates_in_declared_order() {
        let aggregator = Aggregator::new(
            vec![
                StubSource::ok(
                    "one",
                    json!({"recipes": [
                        {"name": "a", "servings": 1},
                        {"name": "b", "servings": 2}
                    ]}),
                ),
                StubSource::ok("two", json!({"recipes": [{"name": "c", "servings": 3}]})),
            ],
            cache(),
        );
        let merged = aggregator.fan_out("anything").await.expect("fan out");
        assert_eq!(
            merged,
            vec![Recipe::new("a", 1), Recipe::new("b", 2), Recipe::new("c", 3)]
        );
    }

    #[tokio::test]
    async fn fan_out_lists_every_failure_once() {
        let aggregator = Aggregator::new(
            vec![
                StubSource::failing("one"),
                StubSource::ok("two", json!({"recipes": []})),
                StubSource::failing("three"),
            ],
            cache(),
        );
        let err = aggregator.fan_out("anything").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "upstream error: one: HTTP 502 Bad Gateway; three: HTTP 502 Bad Gateway"
        );
    }

    #[tokio::test]
    async fn empty_source_contributes_nothing() {
        let aggregator = Aggregator::new(
            vec![
                StubSource::ok("empty", json!({"recipes": []})),
                StubSource::ok("one", json!({"recipes": [{"name": "a", "servings": 1}]})),
            ],
            cache(),
        );
        assert_eq!(
            aggregator.resolve("anything").await.expect("resolve"),
            vec![Recipe::new("a", 1)]
        );
    }

    #[tokio::test]
    async fn resolve_caches_success() {
        let aggregator = Aggregator::new(
            vec![StubSource::ok("one", json!({"recipes": [{"name": "a", "servings": 1}]}))],
            cache(),
        );
        aggregator.resolve("term").await.expect("resolve");
        assert!(aggregator.cache().get("term").await.is_some());
    }

    #[tokio::test]
    async fn resolve_does_not_cache_failure() {
        let aggregator = Aggregator::new(vec![StubSource::failing("one")], cache());
        assert!(aggregator.resolve("term").await.is_err());
        assert!(aggregator.cache().get("term").await.is_none());
    }

    #[test]
    fn from_config_builds_one_source_per_entry() {
        let aggregator = Aggregator::from_config(&SearchConfig::default()).expect("aggregator");
        assert_eq!(aggregator.source_names(), ["source_a", "source_b"]);
        assert_eq!(aggregator.cache().ttl(), Duration::from_secs(600));
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let config = SearchConfig {
            sources: vec![],
            ..Default::default()
        };
        assert!(matches!(
            Aggregator::from_config(&config),
            Err(SearchError::Config(_))
        ));
    }
}
