//! Expiring in-memory store of merged results, keyed by query term.
//!
//! Terms are used verbatim: no case folding or trimming, so `"Pasta"` and
//! `"pasta"` are separate entries. Each entry records when it was stored and
//! is treated as absent once older than the TTL. Backed by [`moka`], which
//! also bounds capacity and reclaims expired entries that are never read
//! again.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::ops::compute::Op;
use tokio::time::Instant;

use crate::config::{SearchConfig, MAX_CACHE_TTL_SECONDS};
use crate::error::SearchError;
use crate::types::Recipe;

/// A cached result set and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Arc<Vec<Recipe>>,
    pub stored_at: Instant,
}

impl CacheEntry {
    fn new(value: Vec<Recipe>) -> Self {
        Self {
            value: Arc::new(value),
            stored_at: Instant::now(),
        }
    }

    /// Time elapsed since this entry was stored.
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// Whether the entry is still within `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() <= ttl
    }
}

/// Shared handle to the result store. Clones refer to the same entries.
///
/// A TTL of zero disables caching: lookups always miss and writes are
/// dropped. TTLs above [`MAX_CACHE_TTL_SECONDS`] are clamped to it.
#[derive(Clone)]
pub struct RecipeCache {
    inner: Cache<String, CacheEntry>,
    ttl: Duration,
}

impl std::fmt::Debug for RecipeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl RecipeCache {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let ttl = ttl.min(Duration::from_secs(MAX_CACHE_TTL_SECONDS));
        let mut builder = Cache::builder().max_capacity(max_entries);
        if !ttl.is_zero() {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: builder.build(),
            ttl,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.cache_ttl(), config.max_cache_entries)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Look up the cached results for `term`.
    ///
    /// Returns `None` on a miss or when the entry is older than the TTL.
    pub async fn get(&self, term: &str) -> Option<Arc<Vec<Recipe>>> {
        self.entry(term).await.map(|entry| entry.value)
    }

    /// Like [`RecipeCache::get`] but also exposes when the entry was stored.
    ///
    /// A stale entry is removed on the way out.
    pub async fn entry(&self, term: &str) -> Option<CacheEntry> {
        if !self.is_enabled() {
            return None;
        }
        let entry = self.inner.get(term).await?;
        if entry.is_fresh(self.ttl) {
            return Some(entry);
        }
        tracing::debug!(age_ms = entry.age().as_millis() as u64, "cache entry expired");
        self.remove_if_unchanged(term, entry.stored_at).await;
        None
    }

    /// Remove the entry for `term` only if it is still the one stored at
    /// `stored_at`. A newer entry written in the meantime is kept.
    async fn remove_if_unchanged(&self, term: &str, stored_at: Instant) {
        self.inner
            .entry_by_ref(term)
            .and_compute_with(|current| {
                std::future::ready(match current {
                    Some(current) if current.value().stored_at == stored_at => Op::Remove,
                    _ => Op::Nop,
                })
            })
            .await;
    }

    /// Store `value` under `term` with the current timestamp, replacing any
    /// previous entry.
    pub async fn put(&self, term: &str, value: Vec<Recipe>) {
        if !self.is_enabled() {
            return;
        }
        self.inner.insert(term.to_owned(), CacheEntry::new(value)).await;
    }

    /// Drop any entry for `term`.
    pub async fn invalidate(&self, term: &str) {
        self.inner.invalidate(term).await;
    }

    /// Number of entries currently held, after applying pending evictions.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    /// Return the entry for `term`, running `init` to populate it if absent.
    ///
    /// Concurrent callers for the same absent term share a single `init`;
    /// the rest wait for its outcome. Errors are returned to every waiter
    /// and never cached. With caching disabled, `init` always runs.
    pub(crate) async fn get_or_populate<F>(
        &self,
        term: &str,
        init: F,
    ) -> Result<CacheEntry, SearchError>
    where
        F: Future<Output = Result<Vec<Recipe>, SearchError>>,
    {
        if !self.is_enabled() {
            return init.await.map(CacheEntry::new);
        }
        self.inner
            .try_get_with(term.to_owned(), async move { init.await.map(CacheEntry::new) })
            .await
            .map_err(|shared: Arc<SearchError>| (*shared).clone())
    }
}
