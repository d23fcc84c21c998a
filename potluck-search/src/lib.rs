//! # potluck-search
//!
//! Recipe search across several upstream sources with one merged answer.
//!
//! ## Design
//!
//! - Queries every configured source concurrently and waits for all of them
//! - Maps each source's payload onto [`Recipe`] with a per-source field mapping
//! - Concatenates results in declared source order
//! - Memoises merged results per query term with a configurable TTL
//! - Coalesces concurrent identical queries into one fan-out
//! - All-or-nothing: any failing source fails the query and nothing is cached
//!
//! Query terms are logged only at trace level.

pub mod advice;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod resolver;
pub mod source;
pub mod sources;
pub mod types;

pub use cache::{CacheEntry, RecipeCache};
pub use config::{
    AdviceConfig, FieldMapping, QuoteSourceConfig, SearchConfig, SourceConfig,
    MAX_CACHE_TTL_SECONDS,
};
pub use error::{Result, SearchError};
pub use resolver::Aggregator;
pub use source::RecipeSource;
pub use types::{Advice, Quote, Recipe, ResultSet};

/// Resolve `term` through `aggregator`, serving a fresh cached result when
/// one exists.
///
/// # Errors
///
/// Returns [`SearchError::Upstream`] if any source fails.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> potluck_search::Result<()> {
/// let aggregator = potluck_search::Aggregator::from_config(&Default::default())?;
/// let recipes = potluck_search::search_recipes("pasta", &aggregator).await?;
/// for recipe in &recipes {
///     println!("{} serves {}", recipe.name, recipe.servings);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search_recipes(term: &str, aggregator: &Aggregator) -> Result<ResultSet> {
    aggregator.resolve(term).await
}

/// Fetch one quote from each configured advice service.
///
/// Builds a one-off HTTP client from `config`; long-lived callers should
/// hold a client and use [`advice::fetch_advice`] directly.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration and
/// [`SearchError::Upstream`] if either service fails.
pub async fn advice(config: &SearchConfig) -> Result<Advice> {
    config.validate()?;
    let client = http::build_client(config)?;
    advice::fetch_advice(&client, &config.advice).await
}
