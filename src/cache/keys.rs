//! Response cache keys.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Key for one cached rendered response.
///
/// The path is kept verbatim so invalidation can match every variant of a
/// page regardless of its query string; the query only contributes a hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseKey {
    pub path: String,
    pub query_hash: u64,
}

impl ResponseKey {
    pub fn new(path: impl Into<String>, query: &str) -> Self {
        Self {
            path: path.into(),
            query_hash: hash_query(query),
        }
    }
}

/// Compute a hash for any hashable value.
pub fn hash_value<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash a query string for response key generation.
pub fn hash_query(query: &str) -> u64 {
    hash_value(&query)
}
