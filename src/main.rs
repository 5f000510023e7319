use std::{process, sync::Arc};

use folia::{
    application::{
        error::AppError,
        feed::FeedService,
        site::SiteService,
        sitemap::SitemapService,
        views::{AggregateCache, ViewCounter, ViewStore, ViewsAggregator},
    },
    cache::{CacheConfig, CacheConsumer, CacheState, CacheTrigger, EventQueue, ResponseStore},
    config,
    domain::content,
    infra::{
        db::PostgresViewStore,
        error::InfraError,
        http::{self, HttpState},
        memory::MemoryViewStore,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;
    content::validate().map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Views(_) => run_views(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = init_store(&settings).await?;
    let app = build_application_context(store, &settings);

    // Backstop consumer for events published without immediate consumption.
    let cache_handle = app.cache_trigger.clone().map(|trigger| {
        let interval_ms = trigger.config().auto_consume_interval_ms;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_millis(interval_ms));
            interval.tick().await; // Skip the first immediate tick
            loop {
                interval.tick().await;
                trigger.consumer().consume().await;
            }
        })
    });

    let result = serve_http(&settings, app.http_state).await;

    if let Some(handle) = cache_handle {
        handle.abort();
        let _ = handle.await;
    }

    result
}

async fn run_views(settings: config::Settings) -> Result<(), AppError> {
    let store = init_store(&settings).await?;
    let aggregate = Arc::new(AggregateCache::new(settings.views.aggregate_ttl));
    let aggregator = ViewsAggregator::new(store, settings.views.key_prefix.clone(), aggregate);

    let slugs = content::post_slugs();
    let counts = aggregator.all_counts(&slugs).await;

    for count in counts {
        println!("{:>8}  {}", count.count, count.slug);
    }
    Ok(())
}

async fn init_store(settings: &config::Settings) -> Result<Arc<dyn ViewStore>, AppError> {
    match settings.database.url.as_deref() {
        Some(url) => {
            let pool = PostgresViewStore::connect(url, settings.database.max_connections.get())
                .await
                .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

            PostgresViewStore::run_migrations(&pool)
                .await
                .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

            Ok(Arc::new(PostgresViewStore::new(pool)))
        }
        None => {
            warn!(
                target = "folia::startup",
                "no database configured; view counts are in-memory and reset on restart"
            );
            Ok(Arc::new(MemoryViewStore::new()))
        }
    }
}

struct ApplicationContext {
    http_state: HttpState,
    cache_trigger: Option<Arc<CacheTrigger>>,
}

fn build_application_context(
    store: Arc<dyn ViewStore>,
    settings: &config::Settings,
) -> ApplicationContext {
    let cache_config = CacheConfig::from(&settings.cache);
    let (cache_trigger, cache_state) = if cache_config.is_enabled() {
        let response_store = Arc::new(ResponseStore::new(&cache_config));
        let queue = Arc::new(EventQueue::new());
        let consumer = Arc::new(CacheConsumer::new(
            cache_config.clone(),
            response_store.clone(),
            queue.clone(),
        ));
        let trigger = Some(Arc::new(CacheTrigger::new(
            cache_config.clone(),
            queue,
            consumer,
        )));
        let state = Some(CacheState {
            config: cache_config,
            store: response_store,
        });
        (trigger, state)
    } else {
        (None, None)
    };

    let aggregate = Arc::new(AggregateCache::new(settings.views.aggregate_ttl));
    let counter = Arc::new(
        ViewCounter::new(
            store.clone(),
            settings.views.key_prefix.clone(),
            aggregate.clone(),
        )
        .with_cache_trigger_opt(cache_trigger.clone()),
    );
    let aggregator = Arc::new(ViewsAggregator::new(
        store.clone(),
        settings.views.key_prefix.clone(),
        aggregate,
    ));

    let http_state = HttpState {
        feed: Arc::new(FeedService::new(aggregator)),
        site: Arc::new(SiteService::new(settings.site.clone())),
        sitemap: Arc::new(SitemapService::new(settings.site.base_url.clone())),
        counter,
        store,
        cache: cache_state,
    };

    ApplicationContext {
        http_state,
        cache_trigger,
    }
}

async fn serve_http(settings: &config::Settings, http_state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(http_state);

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "folia::startup",
        addr = %settings.server.public_addr,
        "Folia listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
