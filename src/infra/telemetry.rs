use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "folia_views_increment_total",
            Unit::Count,
            "Total number of successfully recorded page views."
        );
        describe_counter!(
            "folia_views_increment_failed_total",
            Unit::Count,
            "Total number of page-view increments dropped due to store errors."
        );
        describe_counter!(
            "folia_views_lookup_failed_total",
            Unit::Count,
            "Total number of per-slug count reads degraded to zero."
        );
        describe_counter!(
            "folia_views_aggregate_hit_total",
            Unit::Count,
            "Total number of aggregate count reads served from cache."
        );
        describe_counter!(
            "folia_views_aggregate_miss_total",
            Unit::Count,
            "Total number of aggregate count reads fanned out to the store."
        );
        describe_counter!(
            "folia_cache_response_hit_total",
            Unit::Count,
            "Total number of response-cache hits."
        );
        describe_counter!(
            "folia_cache_response_miss_total",
            Unit::Count,
            "Total number of response-cache misses."
        );
        describe_counter!(
            "folia_cache_response_evict_total",
            Unit::Count,
            "Total number of response-cache evictions due to capacity."
        );
        describe_gauge!(
            "folia_cache_event_queue_len",
            Unit::Count,
            "Current number of pending cache events in the queue."
        );
        describe_histogram!(
            "folia_cache_consume_ms",
            Unit::Milliseconds,
            "Cache consumption latency in milliseconds."
        );
    });
}
