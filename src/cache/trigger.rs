//! Cache trigger service.
//!
//! High-level API for publishing cache events and optionally consuming them
//! immediately. Write paths hold a trigger instead of touching the store.

use std::sync::Arc;

use tracing::debug;

use super::config::CacheConfig;
use super::consumer::CacheConsumer;
use super::events::{EventKind, EventQueue};

pub struct CacheTrigger {
    config: CacheConfig,
    queue: Arc<EventQueue>,
    consumer: Arc<CacheConsumer>,
}

impl CacheTrigger {
    pub fn new(config: CacheConfig, queue: Arc<EventQueue>, consumer: Arc<CacheConsumer>) -> Self {
        Self {
            config,
            queue,
            consumer,
        }
    }

    /// Publish an event and optionally consume immediately.
    ///
    /// With `consume_now` false, the event waits for the auto-consume timer
    /// or the next explicit consumption.
    pub async fn trigger(&self, kind: EventKind, consume_now: bool) {
        if !self.config.is_enabled() {
            debug!(event_kind = ?kind, "Cache trigger skipped: cache disabled");
            return;
        }

        self.queue.publish(kind);

        if consume_now {
            self.consumer.consume().await;
        }
    }

    /// Trigger invalidation after a view-count increment for `slug`.
    pub async fn post_viewed(&self, slug: &str) {
        self.trigger(
            EventKind::PostViewed {
                slug: slug.to_string(),
            },
            true,
        )
        .await;
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    pub fn consumer(&self) -> &Arc<CacheConsumer> {
        &self.consumer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::ResponseStore;

    fn create_trigger(config: CacheConfig) -> CacheTrigger {
        let store = Arc::new(ResponseStore::new(&config));
        let queue = Arc::new(EventQueue::new());
        let consumer = Arc::new(CacheConsumer::new(config.clone(), store, queue.clone()));

        CacheTrigger::new(config, queue, consumer)
    }

    #[tokio::test]
    async fn trigger_publishes_event_without_consuming() {
        let trigger = create_trigger(CacheConfig::default());

        assert!(trigger.queue.is_empty());
        trigger
            .trigger(
                EventKind::PostViewed {
                    slug: "hello-world".to_string(),
                },
                false,
            )
            .await;

        assert_eq!(trigger.queue.len(), 1);
    }

    #[tokio::test]
    async fn trigger_respects_disabled_config() {
        let trigger = create_trigger(CacheConfig {
            enable_response_cache: false,
            ..Default::default()
        });

        trigger.post_viewed("hello-world").await;

        assert!(trigger.queue.is_empty());
    }

    #[tokio::test]
    async fn post_viewed_consumes_immediately() {
        let trigger = create_trigger(CacheConfig::default());

        trigger.post_viewed("hello-world").await;

        assert!(trigger.queue.is_empty());
    }
}
