//! Folia render cache.
//!
//! A single-layer response cache for the public routes, invalidated through
//! an in-memory event queue. View-count increments publish a `PostViewed`
//! event; the consumer evicts the post's page and the listing pages that
//! embed aggregate counts.
//!
//! Behavior is controlled via `folia.toml`:
//!
//! ```toml
//! [cache]
//! enable_response_cache = true
//! response_limit = 200
//! auto_consume_interval_ms = 5000
//! consume_batch_limit = 100
//! ```

mod config;
mod consumer;
mod events;
mod keys;
pub(crate) mod lock;
mod middleware;
mod store;
mod trigger;

pub use config::CacheConfig;
pub use consumer::CacheConsumer;
pub use events::{CacheEvent, Epoch, EventKind, EventQueue};
pub use keys::{ResponseKey, hash_query, hash_value};
pub use middleware::{CacheState, response_cache_layer};
pub use store::{CachedResponse, ResponseStore};
pub use trigger::CacheTrigger;
