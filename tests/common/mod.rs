//! Shared harness: a full router over an in-memory view store.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use folia::{
    application::{
        feed::FeedService,
        site::SiteService,
        sitemap::SitemapService,
        views::{AggregateCache, ViewCounter, ViewStore, ViewsAggregator},
    },
    cache::{CacheConfig, CacheConsumer, CacheState, CacheTrigger, EventQueue, ResponseStore},
    config::SiteSettings,
    infra::{
        http::{HttpState, build_router},
        memory::MemoryViewStore,
    },
};

pub const KEY_PREFIX: &str = "blog_post_views_";

pub struct Harness {
    pub router: Router,
    pub store: Arc<MemoryViewStore>,
    pub counter: Arc<ViewCounter>,
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryViewStore::new());

    let cache_config = CacheConfig::default();
    let response_store = Arc::new(ResponseStore::new(&cache_config));
    let queue = Arc::new(EventQueue::new());
    let consumer = Arc::new(CacheConsumer::new(
        cache_config.clone(),
        response_store.clone(),
        queue.clone(),
    ));
    let trigger = Arc::new(CacheTrigger::new(cache_config.clone(), queue, consumer));

    let aggregate = Arc::new(AggregateCache::new(Duration::from_secs(60)));
    let counter = Arc::new(
        ViewCounter::new(store.clone(), KEY_PREFIX, aggregate.clone())
            .with_cache_trigger_opt(Some(trigger)),
    );
    let aggregator = Arc::new(ViewsAggregator::new(store.clone(), KEY_PREFIX, aggregate));

    let store_dyn: Arc<dyn ViewStore> = store.clone();
    let state = HttpState {
        feed: Arc::new(FeedService::new(aggregator)),
        site: Arc::new(SiteService::new(SiteSettings::default())),
        sitemap: Arc::new(SitemapService::new(
            SiteSettings::default().base_url.clone(),
        )),
        counter: counter.clone(),
        store: store_dyn,
        cache: Some(CacheState {
            config: cache_config,
            store: response_store,
        }),
    };

    Harness {
        router: build_router(state),
        store,
        counter,
    }
}
