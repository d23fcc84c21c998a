//! Trait definition for pluggable upstream recipe sources.
//!
//! Each source fetches a raw payload for a query term and declares the
//! [`FieldMapping`] that turns that payload into canonical recipes.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::FieldMapping;
use crate::error::SearchError;
use crate::normalize::normalize;
use crate::types::Recipe;

/// An upstream recipe source.
///
/// Implementors only fetch; normalisation is shared and driven by
/// [`RecipeSource::mapping`]. All implementations must be `Send + Sync`
/// so the resolver can query them concurrently.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// How this source's payload maps onto [`Recipe`].
    fn mapping(&self) -> &FieldMapping;

    /// Fetch the raw payload for `term`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Upstream`] if the request fails.
    async fn fetch(&self, term: &str) -> Result<Value, SearchError>;

    /// Fetch and normalise in one step.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Upstream`] if the fetch fails or the payload
    /// is not record-shaped.
    async fn search(&self, term: &str) -> Result<Vec<Recipe>, SearchError> {
        let payload = self.fetch(term).await?;
        normalize(self.name(), &payload, self.mapping())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedSource {
        mapping: FieldMapping,
        payload: Option<Value>,
    }

    #[async_trait]
    impl RecipeSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn mapping(&self) -> &FieldMapping {
            &self.mapping
        }

        async fn fetch(&self, _term: &str) -> Result<Value, SearchError> {
            self.payload
                .clone()
                .ok_or_else(|| SearchError::upstream("fixed", "connection reset"))
        }
    }

    #[test]
    fn fixed_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FixedSource>();
    }

    #[tokio::test]
    async fn search_normalises_fetched_payload() {
        let source = FixedSource {
            mapping: FieldMapping::new(Some("recipes"), "recipeName", "yield"),
            payload: Some(json!({"recipes": [{"recipeName": "Tacos", "yield": 4}]})),
        };
        let recipes = source.search("tacos").await.expect("search");
        assert_eq!(recipes, vec![Recipe::new("Tacos", 4)]);
    }

    #[tokio::test]
    async fn search_propagates_fetch_errors() {
        let source = FixedSource {
            mapping: FieldMapping::new(None, "name", "servings"),
            payload: None,
        };
        let err = source.search("tacos").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn search_reports_malformed_payloads() {
        let source = FixedSource {
            mapping: FieldMapping::new(Some("recipes"), "name", "servings"),
            payload: Some(json!({"joke": "no recipes here"})),
        };
        let err = source.search("tacos").await.unwrap_err();
        assert!(matches!(err, SearchError::Upstream(_)));
    }
}
