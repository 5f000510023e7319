//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "folia";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PUBLIC_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_SITE_TITLE: &str = "Folia";
const DEFAULT_SITE_AUTHOR: &str = "Nate B.";
const DEFAULT_SITE_DESCRIPTION: &str =
    "Engineering notes, projects, and the occasional hard-won lesson.";
const DEFAULT_SITE_BASE_URL: &str = "http://127.0.0.1:3000/";
const DEFAULT_VIEWS_KEY_PREFIX: &str = "blog_post_views_";
const DEFAULT_VIEWS_AGGREGATE_TTL_SECS: u64 = 60;
const DEFAULT_CACHE_RESPONSE_LIMIT: usize = 200;
const DEFAULT_CACHE_AUTO_CONSUME_INTERVAL_MS: u64 = 5000;
const DEFAULT_CACHE_CONSUME_BATCH_LIMIT: usize = 100;

/// Command-line arguments for the Folia binary.
#[derive(Debug, Parser)]
#[command(name = "folia", version, about = "Folia site server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOLIA_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Folia HTTP server.
    Serve(Box<ServeArgs>),
    /// Print the stored view counts for every known post.
    #[command(name = "views")]
    Views(ViewsArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the public listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the public listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the storage key prefix for view counts.
    #[arg(long = "views-key-prefix", value_name = "PREFIX")]
    pub views_key_prefix: Option<String>,

    /// Override the aggregate view-count cache TTL.
    #[arg(long = "views-aggregate-ttl-seconds", value_name = "SECONDS")]
    pub views_aggregate_ttl_seconds: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct ViewsArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub site: SiteSettings,
    pub views: ViewsSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub public_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    pub author: String,
    pub description: String,
    pub base_url: Url,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_SITE_TITLE.to_string(),
            author: DEFAULT_SITE_AUTHOR.to_string(),
            description: DEFAULT_SITE_DESCRIPTION.to_string(),
            base_url: Url::parse(DEFAULT_SITE_BASE_URL).expect("default base url is valid"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewsSettings {
    pub key_prefix: String,
    pub aggregate_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enable_response_cache: bool,
    pub response_limit: usize,
    pub auto_consume_interval_ms: u64,
    pub consume_batch_limit: usize,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("FOLIA").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Views(args)) => raw.apply_database_override(&args.database),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    site: RawSiteSettings,
    views: RawViewsSettings,
    cache: RawCacheSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
        if let Some(max) = overrides.database_max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(prefix) = overrides.views_key_prefix.as_ref() {
            self.views.key_prefix = Some(prefix.clone());
        }
        if let Some(ttl) = overrides.views_aggregate_ttl_seconds {
            self.views.aggregate_ttl_seconds = Some(ttl);
        }
    }

    fn apply_database_override(&mut self, overrides: &DatabaseOverride) {
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            database,
            site,
            views,
            cache,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            site: build_site_settings(site)?,
            views: build_views_settings(views)?,
            cache: build_cache_settings(cache)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PUBLIC_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let public_addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.public_addr", reason))?;

    Ok(ServerSettings { public_addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let max_value = database
        .max_connections
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
    let max_connections = non_zero_u32(max_value.into(), "database.max_connections")?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let defaults = SiteSettings::default();

    let title = site.title.unwrap_or(defaults.title);
    if title.trim().is_empty() {
        return Err(LoadError::invalid("site.title", "must not be empty"));
    }

    let base_url = match site.base_url {
        Some(raw) => Url::parse(&raw)
            .map_err(|err| LoadError::invalid("site.base_url", format!("failed to parse: {err}")))?,
        None => defaults.base_url,
    };

    Ok(SiteSettings {
        title,
        author: site.author.unwrap_or(defaults.author),
        description: site.description.unwrap_or(defaults.description),
        base_url,
    })
}

fn build_views_settings(views: RawViewsSettings) -> Result<ViewsSettings, LoadError> {
    let key_prefix = views
        .key_prefix
        .unwrap_or_else(|| DEFAULT_VIEWS_KEY_PREFIX.to_string());
    if key_prefix.is_empty() {
        return Err(LoadError::invalid("views.key_prefix", "must not be empty"));
    }

    let ttl_seconds = views
        .aggregate_ttl_seconds
        .unwrap_or(DEFAULT_VIEWS_AGGREGATE_TTL_SECS);
    if ttl_seconds == 0 {
        return Err(LoadError::invalid(
            "views.aggregate_ttl_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ViewsSettings {
        key_prefix,
        aggregate_ttl: Duration::from_secs(ttl_seconds),
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let response_limit = cache.response_limit.unwrap_or(DEFAULT_CACHE_RESPONSE_LIMIT);
    if response_limit == 0 {
        return Err(LoadError::invalid(
            "cache.response_limit",
            "must be greater than zero",
        ));
    }

    let auto_consume_interval_ms = cache
        .auto_consume_interval_ms
        .unwrap_or(DEFAULT_CACHE_AUTO_CONSUME_INTERVAL_MS);
    if auto_consume_interval_ms == 0 {
        return Err(LoadError::invalid(
            "cache.auto_consume_interval_ms",
            "must be greater than zero",
        ));
    }

    let consume_batch_limit = cache
        .consume_batch_limit
        .unwrap_or(DEFAULT_CACHE_CONSUME_BATCH_LIMIT);
    if consume_batch_limit == 0 {
        return Err(LoadError::invalid(
            "cache.consume_batch_limit",
            "must be greater than zero",
        ));
    }

    Ok(CacheSettings {
        enable_response_cache: cache.enable_response_cache.unwrap_or(true),
        response_limit,
        auto_consume_interval_ms,
        consume_batch_limit,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawViewsSettings {
    key_prefix: Option<String>,
    aggregate_ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enable_response_cache: Option<bool>,
    response_limit: Option<usize>,
    auto_consume_interval_ms: Option<u64>,
    consume_batch_limit: Option<usize>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_take_highest_precedence() {
        let mut raw = RawSettings::default();
        raw.server.port = Some(4000);
        raw.logging.level = Some("info".to_string());

        let overrides = ServeOverrides {
            server_port: Some(4321),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };

        raw.apply_serve_overrides(&overrides);
        let settings = Settings::from_raw(raw).expect("valid settings");

        assert_eq!(settings.server.public_addr.port(), 4321);
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    }

    #[test]
    fn views_defaults_match_the_storage_contract() {
        let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
        assert_eq!(settings.views.key_prefix, "blog_post_views_");
        assert_eq!(settings.views.aggregate_ttl, Duration::from_secs(60));
    }

    #[test]
    fn empty_key_prefix_is_rejected() {
        let mut raw = RawSettings::default();
        raw.views.key_prefix = Some(String::new());
        assert!(Settings::from_raw(raw).is_err());
    }

    #[test]
    fn blank_database_url_resolves_to_none() {
        let mut raw = RawSettings::default();
        raw.database.url = Some("   ".to_string());
        let settings = Settings::from_raw(raw).expect("valid settings");
        assert!(settings.database.url.is_none());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut raw = RawSettings::default();
        raw.site.base_url = Some("not a url".to_string());
        assert!(Settings::from_raw(raw).is_err());
    }

    #[test]
    fn cli_json_logging_enforces_format() {
        let mut raw = RawSettings::default();
        let overrides = ServeOverrides {
            log_json: Some(true),
            ..Default::default()
        };

        raw.apply_serve_overrides(&overrides);
        let settings = Settings::from_raw(raw).expect("valid settings");

        assert!(matches!(settings.logging.format, LogFormat::Json));
    }

    #[test]
    fn default_to_serve_command() {
        let args = CliArgs::parse_from(["folia"]);
        let command = args
            .command
            .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
        assert!(matches!(command, Command::Serve(_)));
    }

    #[test]
    fn parse_views_arguments() {
        let args = CliArgs::parse_from(["folia", "views", "--database-url", "postgres://example"]);

        match args.command.expect("views command") {
            Command::Views(views) => {
                assert_eq!(
                    views.database.database_url.as_deref(),
                    Some("postgres://example")
                );
            }
            _ => panic!("wrong command parsed"),
        }
    }

    #[test]
    fn parse_serve_overrides() {
        let args = CliArgs::parse_from([
            "folia",
            "serve",
            "--server-host",
            "0.0.0.0",
            "--views-key-prefix",
            "views_",
        ]);

        match args.command.expect("serve command") {
            Command::Serve(serve) => {
                assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
                assert_eq!(serve.overrides.views_key_prefix.as_deref(), Some("views_"));
            }
            _ => panic!("wrong command parsed"),
        }
    }
}
