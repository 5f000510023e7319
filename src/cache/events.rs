//! Cache event system.
//!
//! View-count writes publish events here instead of touching the response
//! store directly; the consumer drains the queue and performs the evictions.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::gauge;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::lock::mutex_lock;

const SOURCE: &str = "cache::events";

/// Monotonic epoch for ordering events within this process.
pub type Epoch = u64;

/// Cache event with idempotency and ordering support.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    /// Unique identifier for idempotency (UUIDv4).
    pub id: Uuid,
    /// Monotonic epoch for ordering within this process.
    pub epoch: Epoch,
    /// The type of cache event.
    pub kind: EventKind,
    /// When the event was created.
    pub timestamp: OffsetDateTime,
}

impl CacheEvent {
    pub fn new(kind: EventKind, epoch: Epoch) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch,
            kind,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Types of cache events that trigger invalidation.
///
/// Content is compiled into the binary, so the only runtime mutation that can
/// stale a cached response is a view-count write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A view count was incremented for the given canonical slug.
    PostViewed { slug: String },
}

/// In-memory FIFO event queue.
///
/// Contention is one publish per page view, so a mutex is enough.
pub struct EventQueue {
    queue: Mutex<VecDeque<CacheEvent>>,
    epoch_counter: AtomicU64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            epoch_counter: AtomicU64::new(0),
        }
    }

    /// Get the next epoch number.
    pub fn next_epoch(&self) -> Epoch {
        self.epoch_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Publish an event to the queue.
    pub fn publish(&self, kind: EventKind) {
        let epoch = self.next_epoch();
        let event = CacheEvent::new(kind.clone(), epoch);

        debug!(
            event_id = %event.id,
            event_epoch = event.epoch,
            event_kind = ?kind,
            "Cache event enqueued"
        );

        let len = {
            let mut queue = mutex_lock(&self.queue, SOURCE, "publish");
            queue.push_back(event);
            queue.len()
        };
        gauge!("folia_cache_event_queue_len").set(len as f64);
    }

    /// Drain up to `limit` events from the queue, in FIFO order.
    pub fn drain(&self, limit: usize) -> Vec<CacheEvent> {
        let (events, len) = {
            let mut queue = mutex_lock(&self.queue, SOURCE, "drain");
            let count = limit.min(queue.len());
            let events: Vec<CacheEvent> = queue.drain(..count).collect();
            (events, queue.len())
        };
        gauge!("folia_cache_event_queue_len").set(len as f64);
        events
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.queue, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        mutex_lock(&self.queue, SOURCE, "clear").clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    fn viewed(slug: &str) -> EventKind {
        EventKind::PostViewed {
            slug: slug.to_string(),
        }
    }

    #[test]
    fn event_creation() {
        let event = CacheEvent::new(viewed("hello-world"), 42);

        assert_eq!(event.epoch, 42);
        assert_eq!(event.kind, viewed("hello-world"));
        assert!(!event.id.is_nil());
    }

    #[test]
    fn epoch_monotonicity() {
        let queue = EventQueue::new();

        let e1 = queue.next_epoch();
        let e2 = queue.next_epoch();
        let e3 = queue.next_epoch();

        assert!(e1 < e2);
        assert!(e2 < e3);
    }

    #[test]
    fn publish_and_drain_preserves_fifo_order() {
        let queue = EventQueue::new();

        queue.publish(viewed("first"));
        queue.publish(viewed("second"));
        queue.publish(viewed("third"));

        assert_eq!(queue.len(), 3);

        let events = queue.drain(2);
        assert_eq!(events.len(), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(events[0].kind, viewed("first"));
        assert_eq!(events[1].kind, viewed("second"));
    }

    #[test]
    fn drain_more_than_available() {
        let queue = EventQueue::new();

        queue.publish(viewed("only"));

        let events = queue.drain(100);
        assert_eq!(events.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn event_queue_recovers_from_poisoned_lock() {
        let queue = EventQueue::new();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = queue.queue.lock().expect("queue lock should be acquired");
            panic!("poison queue lock");
        }));

        queue.publish(viewed("hello-world"));
        assert_eq!(queue.len(), 1);
    }
}
