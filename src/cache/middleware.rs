//! Response cache middleware.
//!
//! Caches successful GET responses on the public routes and replays them on
//! subsequent hits. Invalidation happens out-of-band via the event consumer.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use tracing::{debug, instrument};

use super::{CacheConfig, ResponseStore, keys::ResponseKey, store::CachedResponse};

/// Largest response body the cache will hold.
const MAX_CACHED_BODY_BYTES: usize = 1024 * 1024;

/// Shared cache state for the middleware layer.
#[derive(Clone)]
pub struct CacheState {
    pub config: CacheConfig,
    pub store: Arc<ResponseStore>,
}

/// Middleware caching GET responses that return 200 OK.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(cache): State<CacheState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !cache.config.enable_response_cache {
        return next.run(request).await;
    }

    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("");
    let key = ResponseKey::new(path, query);

    if let Some(cached) = cache.store.get(&key) {
        counter!("folia_cache_response_hit_total").increment(1);
        debug!(outcome = "hit", "serving cached response");
        return build_response(cached);
    }

    counter!("folia_cache_response_miss_total").increment(1);
    debug!(outcome = "miss", "cache miss, executing handler");

    let response = next.run(request).await;

    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_CACHED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            // Body exceeded the cacheable limit or failed to collect; the
            // original stream is already consumed, so refuse rather than
            // replay a truncated page.
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let cached = CachedResponse {
        status: parts.status.as_u16(),
        headers: parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect(),
        body: bytes.clone(),
    };

    cache.store.set(key, cached);

    Response::from_parts(parts, Body::from(bytes))
}

fn build_response(cached: CachedResponse) -> Response {
    let mut builder = Response::builder().status(cached.status);

    for (name, value) in cached.headers {
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            builder = builder.header(name, header_value);
        }
    }

    builder
        .body(Body::from(cached.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
