//! In-memory view store.
//!
//! Used when no database is configured (counts reset on restart) and as the
//! store backing tests.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::views::{ViewStore, ViewStoreError};

#[derive(Default)]
pub struct MemoryViewStore {
    entries: DashMap<String, i64>,
}

impl MemoryViewStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ViewStore for MemoryViewStore {
    async fn get(&self, key: &str) -> Result<Option<i64>, ViewStoreError> {
        Ok(self.entries.get(key).map(|entry| *entry.value()))
    }

    async fn set(&self, key: &str, value: i64) -> Result<(), ViewStoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn health(&self) -> Result<(), ViewStoreError> {
        Ok(())
    }
}
