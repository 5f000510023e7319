//! Postgres-backed view store.
//!
//! The key-value contract is a single two-column table; the store never
//! interprets keys beyond equality.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::application::views::{ViewStore, ViewStoreError};

#[derive(Clone)]
pub struct PostgresViewStore {
    pool: PgPool,
}

impl PostgresViewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }
}

fn store_error(err: sqlx::Error) -> ViewStoreError {
    ViewStoreError::unavailable(err.to_string())
}

#[async_trait]
impl ViewStore for PostgresViewStore {
    async fn get(&self, key: &str) -> Result<Option<i64>, ViewStoreError> {
        sqlx::query_scalar::<_, i64>("SELECT count FROM view_counts WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn set(&self, key: &str, value: i64) -> Result<(), ViewStoreError> {
        sqlx::query(
            "INSERT INTO view_counts (key, count) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET count = EXCLUDED.count",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(store_error)
    }

    async fn health(&self) -> Result<(), ViewStoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}
