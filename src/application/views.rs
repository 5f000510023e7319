//! Page-view tracking.
//!
//! The smallest stateful feature of the site, split into four pieces:
//!
//! - [`ViewStore`]: the seam to the external key-value service.
//! - [`ViewCounter`]: best-effort read-increment-write plus cache
//!   invalidation. Failures are logged and swallowed; a view count must never
//!   break a page render.
//! - [`ViewsAggregator`]: concurrent fan-out read of every known slug for the
//!   list pages, behind an injected TTL cache.
//! - [`view_count_label`] / [`ViewCounter::schedule_increment`]: the display
//!   half, split into a pure compute function and an explicit fire-and-forget
//!   scheduling call so the side effect is visible at the call site.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheTrigger, lock};
use crate::domain::slug;
use crate::domain::views::{ViewCount, storage_key};

const SOURCE: &str = "application::views";

#[derive(Debug, Error)]
pub enum ViewStoreError {
    #[error("view store unavailable: {message}")]
    Unavailable { message: String },
    #[error("view store rejected key `{key}`: {message}")]
    Rejected { key: String, message: String },
}

impl ViewStoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Handle to the external key-value service holding the counts.
///
/// An absent key is semantically zero; implementations never create keys on
/// read.
#[async_trait]
pub trait ViewStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<i64>, ViewStoreError>;
    async fn set(&self, key: &str, value: i64) -> Result<(), ViewStoreError>;
    async fn health(&self) -> Result<(), ViewStoreError>;
}

/// Explicit, injected cache for the aggregated counts.
///
/// One entry, bounded by TTL, invalidated eagerly after every successful
/// increment. Constructed per test for isolation.
pub struct AggregateCache {
    ttl: Duration,
    entry: RwLock<Option<CachedAggregate>>,
}

struct CachedAggregate {
    fetched_at: Instant,
    counts: Vec<ViewCount>,
}

impl AggregateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    fn get(&self) -> Option<Vec<ViewCount>> {
        let guard = lock::rw_read(&self.entry, SOURCE, "aggregate_get");
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.counts.clone())
    }

    fn put(&self, counts: Vec<ViewCount>) {
        *lock::rw_write(&self.entry, SOURCE, "aggregate_put") = Some(CachedAggregate {
            fetched_at: Instant::now(),
            counts,
        });
    }

    pub fn invalidate(&self) {
        *lock::rw_write(&self.entry, SOURCE, "aggregate_invalidate") = None;
    }
}

/// Best-effort view counter.
pub struct ViewCounter {
    store: Arc<dyn ViewStore>,
    key_prefix: String,
    aggregate: Arc<AggregateCache>,
    cache_trigger: Option<Arc<CacheTrigger>>,
}

impl ViewCounter {
    pub fn new(
        store: Arc<dyn ViewStore>,
        key_prefix: impl Into<String>,
        aggregate: Arc<AggregateCache>,
    ) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            aggregate,
            cache_trigger: None,
        }
    }

    pub fn with_cache_trigger_opt(mut self, trigger: Option<Arc<CacheTrigger>>) -> Self {
        self.cache_trigger = trigger;
        self
    }

    /// Record one view for `raw_slug`.
    ///
    /// Read-modify-write with no concurrency control: two concurrent
    /// increments for the same slug can both read N and both write N+1,
    /// losing one view. Accepted — the counter is approximate by contract
    /// and write contention is one increment per page view.
    ///
    /// Never returns an error: store failures are logged and the call
    /// no-ops without retry.
    pub async fn increment(&self, raw_slug: &str) {
        let canonical = slug::normalize(raw_slug);
        if canonical.is_empty() {
            debug!(target = SOURCE, raw_slug, "skipping increment for empty slug");
            return;
        }

        let key = storage_key(&self.key_prefix, &canonical);

        let current = match self.store.get(&key).await {
            Ok(value) => value.unwrap_or(0),
            Err(err) => {
                counter!("folia_views_increment_failed_total").increment(1);
                warn!(
                    target = SOURCE,
                    slug = %canonical,
                    error = %err,
                    "view count read failed, dropping increment"
                );
                return;
            }
        };

        if let Err(err) = self.store.set(&key, current.saturating_add(1)).await {
            counter!("folia_views_increment_failed_total").increment(1);
            warn!(
                target = SOURCE,
                slug = %canonical,
                error = %err,
                "view count write failed, dropping increment"
            );
            return;
        }

        counter!("folia_views_increment_total").increment(1);

        // Stale renders: the post's page and the aggregate listings.
        self.aggregate.invalidate();
        if let Some(trigger) = &self.cache_trigger {
            trigger.post_viewed(&canonical).await;
        }
    }

    /// Schedule an increment detached from the calling request.
    ///
    /// The spawned task outlives an aborted request and is never awaited by
    /// the render path.
    pub fn schedule_increment(self: Arc<Self>, raw_slug: &str) {
        let raw_slug = raw_slug.to_string();
        tokio::spawn(async move {
            self.increment(&raw_slug).await;
        });
    }
}

/// Order-preserving aggregate reader for list pages.
pub struct ViewsAggregator {
    store: Arc<dyn ViewStore>,
    key_prefix: String,
    cache: Arc<AggregateCache>,
}

impl ViewsAggregator {
    pub fn new(
        store: Arc<dyn ViewStore>,
        key_prefix: impl Into<String>,
        cache: Arc<AggregateCache>,
    ) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            cache,
        }
    }

    /// Fetch counts for every slug, concurrently, preserving input order.
    ///
    /// A failed read degrades that slug to zero instead of failing the whole
    /// aggregation. The result is cached until the TTL lapses or an
    /// increment invalidates it.
    pub async fn all_counts(&self, slugs: &[&str]) -> Vec<ViewCount> {
        let canonical: Vec<String> = slugs.iter().map(|raw| slug::normalize(raw)).collect();

        if let Some(cached) = self.cache.get() {
            let matches = cached.len() == canonical.len()
                && cached
                    .iter()
                    .zip(canonical.iter())
                    .all(|(count, slug)| &count.slug == slug);
            if matches {
                counter!("folia_views_aggregate_hit_total").increment(1);
                return cached;
            }
        }

        counter!("folia_views_aggregate_miss_total").increment(1);
        let reads = canonical.iter().map(|slug| self.read_one(slug));
        let counts: Vec<ViewCount> = join_all(reads).await;

        self.cache.put(counts.clone());
        counts
    }

    async fn read_one(&self, canonical: &str) -> ViewCount {
        let key = format!("{}{canonical}", self.key_prefix);
        match self.store.get(&key).await {
            Ok(Some(value)) => ViewCount::new(canonical, value.max(0) as u64),
            Ok(None) => ViewCount::zero(canonical),
            Err(err) => {
                counter!("folia_views_lookup_failed_total").increment(1);
                warn!(
                    target = SOURCE,
                    slug = %canonical,
                    error = %err,
                    "view count lookup failed, degrading to zero"
                );
                ViewCount::zero(canonical)
            }
        }
    }
}

/// Pure display half of the view counter.
///
/// Looks up `raw_slug` in the aggregated counts. Returns `None` when the
/// count is absent or zero and the render is not tracking a view. When
/// `tracking` is set the label shows `stored + 1` — optimistic, because the
/// increment scheduled alongside has not necessarily landed yet.
pub fn view_count_label(raw_slug: &str, counts: &[ViewCount], tracking: bool) -> Option<String> {
    let canonical = slug::normalize(raw_slug);
    let stored = counts
        .iter()
        .find(|count| count.slug == canonical)
        .map(|count| count.count)
        .unwrap_or(0);

    let shown = if tracking { stored + 1 } else { stored };
    if shown == 0 {
        return None;
    }

    Some(format!("{} views", group_thousands(shown)))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryViewStore;

    const PREFIX: &str = "blog_post_views_";

    struct FailingStore;

    #[async_trait]
    impl ViewStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<i64>, ViewStoreError> {
            Err(ViewStoreError::unavailable("connection refused"))
        }

        async fn set(&self, key: &str, _value: i64) -> Result<(), ViewStoreError> {
            Err(ViewStoreError::rejected(key, "read only"))
        }

        async fn health(&self) -> Result<(), ViewStoreError> {
            Err(ViewStoreError::unavailable("connection refused"))
        }
    }

    fn fresh_cache() -> Arc<AggregateCache> {
        Arc::new(AggregateCache::new(Duration::from_secs(60)))
    }

    fn counter_with(store: Arc<dyn ViewStore>) -> Arc<ViewCounter> {
        Arc::new(ViewCounter::new(store, PREFIX, fresh_cache()))
    }

    #[tokio::test]
    async fn sequential_increments_accumulate() {
        let store = Arc::new(MemoryViewStore::new());
        let counter = counter_with(store.clone());

        for _ in 0..3 {
            counter.increment("hello-world").await;
        }

        let stored = store
            .get("blog_post_views_hello-world")
            .await
            .expect("read");
        assert_eq!(stored, Some(3));
    }

    #[tokio::test]
    async fn increment_normalizes_prefixed_slugs() {
        let store = Arc::new(MemoryViewStore::new());
        let counter = counter_with(store.clone());

        counter.increment("blog_post_views_/hello-world").await;
        counter.increment("blog/hello-world").await;

        let stored = store
            .get("blog_post_views_hello-world")
            .await
            .expect("read");
        assert_eq!(stored, Some(2));
    }

    #[tokio::test]
    async fn increment_swallows_store_failures() {
        let counter = counter_with(Arc::new(FailingStore));

        // Must not panic or propagate anything.
        counter.increment("hello-world").await;
    }

    #[tokio::test]
    async fn increment_ignores_empty_slugs() {
        let store = Arc::new(MemoryViewStore::new());
        let counter = counter_with(store.clone());

        counter.increment("blog/").await;

        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn aggregator_preserves_input_order() {
        let store = Arc::new(MemoryViewStore::new());
        store.set("blog_post_views_b", 7).await.expect("seed");

        let aggregator = ViewsAggregator::new(store, PREFIX, fresh_cache());
        let counts = aggregator.all_counts(&["a", "b", "c"]).await;

        let slugs: Vec<&str> = counts.iter().map(|count| count.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
        assert_eq!(counts[1].count, 7);
        assert_eq!(counts[0].count, 0);
        assert_eq!(counts[2].count, 0);
    }

    #[tokio::test]
    async fn aggregator_degrades_failed_reads_to_zero() {
        let aggregator = ViewsAggregator::new(Arc::new(FailingStore), PREFIX, fresh_cache());

        let counts = aggregator.all_counts(&["a", "b"]).await;

        assert_eq!(counts, vec![ViewCount::zero("a"), ViewCount::zero("b")]);
    }

    #[tokio::test]
    async fn aggregator_serves_cached_counts_until_invalidated() {
        let store = Arc::new(MemoryViewStore::new());
        let cache = fresh_cache();
        let aggregator = ViewsAggregator::new(store.clone(), PREFIX, cache.clone());

        let first = aggregator.all_counts(&["a"]).await;
        assert_eq!(first[0].count, 0);

        store.set("blog_post_views_a", 5).await.expect("seed");

        // Still cached: the write is invisible until invalidation.
        let second = aggregator.all_counts(&["a"]).await;
        assert_eq!(second[0].count, 0);

        cache.invalidate();
        let third = aggregator.all_counts(&["a"]).await;
        assert_eq!(third[0].count, 5);
    }

    #[tokio::test]
    async fn increment_invalidates_the_aggregate_cache() {
        let store = Arc::new(MemoryViewStore::new());
        let cache = fresh_cache();
        let aggregator = ViewsAggregator::new(store.clone(), PREFIX, cache.clone());
        let counter = Arc::new(ViewCounter::new(store, PREFIX, cache));

        assert_eq!(aggregator.all_counts(&["a"]).await[0].count, 0);
        counter.increment("a").await;
        assert_eq!(aggregator.all_counts(&["a"]).await[0].count, 1);
    }

    #[test]
    fn label_hides_zero_when_not_tracking() {
        assert_eq!(view_count_label("a", &[ViewCount::zero("a")], false), None);
        assert_eq!(view_count_label("missing", &[], false), None);
    }

    #[test]
    fn label_shows_stored_count_when_not_tracking() {
        let counts = vec![ViewCount::new("a", 41)];
        assert_eq!(
            view_count_label("a", &counts, false),
            Some("41 views".to_string())
        );
    }

    #[test]
    fn label_is_optimistic_when_tracking() {
        let counts = vec![ViewCount::new("a", 41)];
        assert_eq!(
            view_count_label("a", &counts, true),
            Some("42 views".to_string())
        );
        // Absent count still shows the view being recorded right now.
        assert_eq!(
            view_count_label("missing", &[], true),
            Some("1 views".to_string())
        );
    }

    #[test]
    fn label_accepts_prefixed_slugs() {
        let counts = vec![ViewCount::new("hello-world", 2)];
        assert_eq!(
            view_count_label("blog/hello-world", &counts, false),
            Some("2 views".to_string())
        );
    }

    #[test]
    fn thousands_are_grouped() {
        let counts = vec![ViewCount::new("a", 1_234_567)];
        assert_eq!(
            view_count_label("a", &counts, false),
            Some("1,234,567 views".to_string())
        );
    }
}
