//! Response cache storage.
//!
//! An LRU map from [`ResponseKey`] to fully rendered responses. Eviction by
//! capacity is handled by the LRU; eviction by invalidation goes through
//! [`ResponseStore::evict_path`], which removes every query variant of a path.

use std::sync::Mutex;

use bytes::Bytes;
use lru::LruCache;
use metrics::counter;

use super::config::CacheConfig;
use super::keys::ResponseKey;
use super::lock::mutex_lock;

const SOURCE: &str = "cache::store";

/// A rendered response, stored ready to replay.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

pub struct ResponseStore {
    entries: Mutex<LruCache<ResponseKey, CachedResponse>>,
}

impl ResponseStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(config.response_limit_non_zero())),
        }
    }

    pub fn get(&self, key: &ResponseKey) -> Option<CachedResponse> {
        mutex_lock(&self.entries, SOURCE, "get").get(key).cloned()
    }

    pub fn set(&self, key: ResponseKey, response: CachedResponse) {
        let mut entries = mutex_lock(&self.entries, SOURCE, "set");
        if entries.len() == entries.cap().get() && !entries.contains(&key) {
            counter!("folia_cache_response_evict_total").increment(1);
        }
        entries.put(key, response);
    }

    /// Remove every cached variant of `path`, returning how many were evicted.
    pub fn evict_path(&self, path: &str) -> usize {
        let mut entries = mutex_lock(&self.entries, SOURCE, "evict_path");
        let keys: Vec<ResponseKey> = entries
            .iter()
            .filter(|(key, _)| key.path == path)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys {
            entries.pop(key);
        }
        keys.len()
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        mutex_lock(&self.entries, SOURCE, "clear").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_limit(limit: usize) -> ResponseStore {
        ResponseStore::new(&CacheConfig {
            response_limit: limit,
            ..Default::default()
        })
    }

    fn response(body: &str) -> CachedResponse {
        CachedResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn set_and_get_round_trip() {
        let store = store_with_limit(10);
        let key = ResponseKey::new("/blog/hello", "");

        store.set(key.clone(), response("<html>hello</html>"));

        let cached = store.get(&key).expect("cached response");
        assert_eq!(cached.status, 200);
        assert_eq!(cached.body, Bytes::from("<html>hello</html>"));
    }

    #[test]
    fn evict_path_removes_all_query_variants() {
        let store = store_with_limit(10);

        store.set(ResponseKey::new("/blog", ""), response("page1"));
        store.set(ResponseKey::new("/blog", "page=2"), response("page2"));
        store.set(ResponseKey::new("/", ""), response("home"));

        let evicted = store.evict_path("/blog");
        assert_eq!(evicted, 2);
        assert!(store.get(&ResponseKey::new("/blog", "")).is_none());
        assert!(store.get(&ResponseKey::new("/blog", "page=2")).is_none());
        assert!(store.get(&ResponseKey::new("/", "")).is_some());
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let store = store_with_limit(2);

        store.set(ResponseKey::new("/a", ""), response("a"));
        store.set(ResponseKey::new("/b", ""), response("b"));
        // Touch /a so /b becomes the eviction candidate.
        let _ = store.get(&ResponseKey::new("/a", ""));
        store.set(ResponseKey::new("/c", ""), response("c"));

        assert!(store.get(&ResponseKey::new("/a", "")).is_some());
        assert!(store.get(&ResponseKey::new("/b", "")).is_none());
        assert!(store.get(&ResponseKey::new("/c", "")).is_some());
    }
}
