//! JSON-over-HTTP recipe source driven by a [`SourceConfig`].

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{FieldMapping, SourceConfig};
use crate::error::SearchError;
use crate::http::fetch_json;
use crate::source::RecipeSource;

/// A source reached by GET on its rendered address template.
#[derive(Debug, Clone)]
pub struct HttpSource {
    config: SourceConfig,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(config: SourceConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

#[async_trait]
impl RecipeSource for HttpSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn mapping(&self) -> &FieldMapping {
        &self.config.mapping
    }

    async fn fetch(&self, term: &str) -> Result<Value, SearchError> {
        let url = self.config.url_for(term);
        tracing::trace!(source = %self.config.name, %url, "fetching recipes");
        fetch_json(&self.client, &self.config.name, &url).await
    }
}
