//! Inbound facade: the operations a transport layer would expose.
//!
//! [`RecipeService`] owns one [`Aggregator`] (and therefore one result
//! cache) plus the HTTP client shared with the advice lookup.

use potluck_search::advice::fetch_advice;
use potluck_search::http::build_client;
use potluck_search::{Advice, AdviceConfig, Aggregator, Recipe};

use crate::config::PotluckConfig;
use crate::error::Result;

/// Recipe search and advice over the configured upstream services.
#[derive(Debug)]
pub struct RecipeService {
    aggregator: Aggregator,
    client: reqwest::Client,
    advice: AdviceConfig,
}

impl RecipeService {
    /// Build the service from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the search configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &PotluckConfig) -> Result<Self> {
        config.search.validate()?;
        let client = build_client(&config.search)?;
        let aggregator = Aggregator::with_client(&config.search, client.clone());
        tracing::info!(
            sources = ?aggregator.source_names(),
            ttl_secs = config.search.cache_ttl_seconds,
            "recipe service ready"
        );
        Ok(Self {
            aggregator,
            client,
            advice: config.search.advice.clone(),
        })
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// `searchRecipes(query)`: merged recipes from every source, cached per query.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if any source fails; nothing is cached then.
    pub async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>> {
        Ok(self.aggregator.resolve(query).await?)
    }

    /// Like [`RecipeService::search_recipes`] but always fans out.
    ///
    /// # Errors
    ///
    /// Same as [`RecipeService::search_recipes`].
    pub async fn refresh_recipes(&self, query: &str) -> Result<Vec<Recipe>> {
        Ok(self.aggregator.refresh(query).await?)
    }

    /// `advice`: one quote from each advice service.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if either service fails.
    pub async fn advice(&self) -> Result<Advice> {
        Ok(fetch_advice(&self.client, &self.advice).await?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::error::PotluckError;
    use potluck_search::SearchError;

    #[test]
    fn from_default_config() {
        let service = RecipeService::from_config(&PotluckConfig::default()).unwrap();
        assert_eq!(service.aggregator().source_names(), ["source_a", "source_b"]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = PotluckConfig::default();
        config.search.sources.clear();
        let err = RecipeService::from_config(&config).unwrap_err();
        assert!(matches!(err, PotluckError::Search(SearchError::Config(_))));
    }
}
