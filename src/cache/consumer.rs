//! Cache event consumer.
//!
//! Drains the event queue and evicts the response-cache entries a view-count
//! write can stale: the post's own page and the listings that embed aggregate
//! counts. Paths are deduplicated per batch so a burst of views on one post
//! costs one pass over the store.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use metrics::histogram;
use tracing::debug;

use super::config::CacheConfig;
use super::events::{CacheEvent, EventKind, EventQueue};
use super::store::ResponseStore;

/// Listing pages that render aggregate view counts.
const AGGREGATE_PATHS: &[&str] = &["/", "/blog"];

pub struct CacheConsumer {
    config: CacheConfig,
    store: Arc<ResponseStore>,
    queue: Arc<EventQueue>,
}

impl CacheConsumer {
    pub fn new(config: CacheConfig, store: Arc<ResponseStore>, queue: Arc<EventQueue>) -> Self {
        Self {
            config,
            store,
            queue,
        }
    }

    /// Drain one batch of events and evict the affected paths.
    pub async fn consume(&self) {
        let events = self.queue.drain(self.config.consume_batch_limit);
        if events.is_empty() {
            return;
        }

        let started = Instant::now();
        let paths = affected_paths(&events);
        let mut evicted = 0usize;
        for path in &paths {
            evicted += self.store.evict_path(path);
        }

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!("folia_cache_consume_ms").record(elapsed_ms);
        debug!(
            events = events.len(),
            paths = paths.len(),
            evicted,
            elapsed_ms,
            "Cache events consumed"
        );
    }
}

/// Distinct response paths staled by a batch of events.
fn affected_paths(events: &[CacheEvent]) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    for event in events {
        match &event.kind {
            EventKind::PostViewed { slug } => {
                paths.insert(format!("/blog/{slug}"));
                for path in AGGREGATE_PATHS {
                    paths.insert((*path).to_string());
                }
            }
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::ResponseKey;
    use crate::cache::store::CachedResponse;
    use bytes::Bytes;

    fn cached(body: &str) -> CachedResponse {
        CachedResponse {
            status: 200,
            headers: Vec::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn build_consumer() -> (CacheConsumer, Arc<ResponseStore>, Arc<EventQueue>) {
        let config = CacheConfig::default();
        let store = Arc::new(ResponseStore::new(&config));
        let queue = Arc::new(EventQueue::new());
        let consumer = CacheConsumer::new(config, store.clone(), queue.clone());
        (consumer, store, queue)
    }

    #[test]
    fn affected_paths_cover_post_and_aggregates() {
        let events = vec![CacheEvent::new(
            EventKind::PostViewed {
                slug: "hello-world".to_string(),
            },
            0,
        )];

        let paths = affected_paths(&events);
        assert!(paths.contains("/blog/hello-world"));
        assert!(paths.contains("/blog"));
        assert!(paths.contains("/"));
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn duplicate_events_deduplicate_paths() {
        let events: Vec<CacheEvent> = (0..5)
            .map(|epoch| {
                CacheEvent::new(
                    EventKind::PostViewed {
                        slug: "hello-world".to_string(),
                    },
                    epoch,
                )
            })
            .collect();

        assert_eq!(affected_paths(&events).len(), 3);
    }

    #[tokio::test]
    async fn consume_evicts_stale_pages_and_leaves_others() {
        let (consumer, store, queue) = build_consumer();

        store.set(ResponseKey::new("/blog/hello-world", ""), cached("post"));
        store.set(ResponseKey::new("/blog", ""), cached("index"));
        store.set(ResponseKey::new("/projects", ""), cached("projects"));

        queue.publish(EventKind::PostViewed {
            slug: "hello-world".to_string(),
        });
        consumer.consume().await;

        assert!(queue.is_empty());
        assert!(store.get(&ResponseKey::new("/blog/hello-world", "")).is_none());
        assert!(store.get(&ResponseKey::new("/blog", "")).is_none());
        assert!(store.get(&ResponseKey::new("/projects", "")).is_some());
    }

    #[tokio::test]
    async fn consume_on_empty_queue_is_a_no_op() {
        let (consumer, store, _queue) = build_consumer();
        store.set(ResponseKey::new("/", ""), cached("home"));

        consumer.consume().await;

        assert!(store.get(&ResponseKey::new("/", "")).is_some());
    }
}
