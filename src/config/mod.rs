//! Configuration layer: typed settings with layered precedence
//! (file → environment → CLI).
//!
//! The pretalx section additionally honors the environment variables
//! the original deployment used (`PRETALX_API_TOKEN`,
//! `PRETALX_BASE_URL`, `PRETALX_SLUG`); those sit between the
//! `PODIUM__*` environment layer and CLI flags in precedence.

use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "podium";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PUBLIC_PORT: u16 = 3000;
const DEFAULT_PRETALX_BASE_URL: &str = "https://pretalx.com";
const DEFAULT_EVENT_SLUG: &str = "pycon-apac-2025";
const DEFAULT_SPEAKER_TTL_SECS: u64 = 43_200;

pub const PRETALX_API_TOKEN_VAR: &str = "PRETALX_API_TOKEN";
pub const PRETALX_BASE_URL_VAR: &str = "PRETALX_BASE_URL";
pub const PRETALX_SLUG_VAR: &str = "PRETALX_SLUG";

/// Command-line arguments for the Podium binary.
#[derive(Debug, Parser)]
#[command(name = "podium", version, about = "Conference website content server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PODIUM_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Podium HTTP service.
    Serve(Box<ServeArgs>),
    /// Resolve a speaker list once and print it as JSON.
    Speakers(SpeakersArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub pretalx: PretalxOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
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

    /// Override the page content file.
    #[arg(long = "content-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub content_file: Option<PathBuf>,

    /// Override the speaker list cache TTL in seconds.
    #[arg(long = "speaker-ttl-seconds", value_name = "SECONDS")]
    pub speaker_ttl_seconds: Option<u64>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PretalxOverrides {
    /// Override the pretalx base URL.
    #[arg(long = "pretalx-base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the pretalx event slug.
    #[arg(long = "pretalx-event-slug", value_name = "SLUG")]
    pub event_slug: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SpeakersArgs {
    #[command(flatten)]
    pub overrides: PretalxOverrides,

    /// Resolve the keynote list instead of the non-keynote speakers.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub keynotes: bool,
}

/// Fully-resolved deployment settings after precedence resolution and
/// validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub pretalx: PretalxSettings,
    pub content: ContentSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
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
pub struct PretalxSettings {
    /// Absent token disables outbound fetching entirely; it is not an
    /// error.
    pub api_token: Option<String>,
    pub base_url: Url,
    pub event_slug: String,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub speaker_ttl: time::Duration,
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

    builder = builder.add_source(Environment::with_prefix("PODIUM").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    raw.apply_pretalx_env(|name| std::env::var(name).ok());

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Speakers(args)) => raw.apply_pretalx_overrides(&args.overrides),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning
/// both for downstream use.
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
    pretalx: RawPretalxSettings,
    content: RawContentSettings,
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
        if let Some(file) = overrides.content_file.as_ref() {
            self.content.file = Some(file.clone());
        }
        if let Some(ttl) = overrides.speaker_ttl_seconds {
            self.cache.speaker_ttl_seconds = Some(ttl);
        }

        self.apply_pretalx_overrides(&overrides.pretalx);
    }

    fn apply_pretalx_overrides(&mut self, overrides: &PretalxOverrides) {
        if let Some(url) = overrides.base_url.as_ref() {
            self.pretalx.base_url = Some(url.clone());
        }
        if let Some(slug) = overrides.event_slug.as_ref() {
            self.pretalx.event_slug = Some(slug.clone());
        }
    }

    /// Fold in the `PRETALX_*` environment variables; `lookup` is
    /// injectable so tests stay hermetic.
    fn apply_pretalx_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(PRETALX_API_TOKEN_VAR) {
            self.pretalx.api_token = Some(token);
        }
        if let Some(url) = lookup(PRETALX_BASE_URL_VAR) {
            self.pretalx.base_url = Some(url);
        }
        if let Some(slug) = lookup(PRETALX_SLUG_VAR) {
            self.pretalx.event_slug = Some(slug);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            pretalx,
            content,
            cache,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            pretalx: build_pretalx_settings(pretalx)?,
            content: ContentSettings { file: content.file },
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

    let candidate = format!("{host}:{port}");
    let addr = candidate
        .parse()
        .map_err(|err| LoadError::invalid("server.addr", format!("invalid `{candidate}`: {err}")))?;

    Ok(ServerSettings { addr })
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

fn build_pretalx_settings(pretalx: RawPretalxSettings) -> Result<PretalxSettings, LoadError> {
    let api_token = pretalx.api_token.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let base_url_value = pretalx
        .base_url
        .unwrap_or_else(|| DEFAULT_PRETALX_BASE_URL.to_string());
    let base_url = Url::parse(&base_url_value).map_err(|err| {
        LoadError::invalid(
            "pretalx.base_url",
            format!("invalid url `{base_url_value}`: {err}"),
        )
    })?;

    let event_slug = pretalx
        .event_slug
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_EVENT_SLUG.to_string());

    Ok(PretalxSettings {
        api_token,
        base_url,
        event_slug,
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let ttl_seconds = cache
        .speaker_ttl_seconds
        .unwrap_or(DEFAULT_SPEAKER_TTL_SECS);
    if ttl_seconds == 0 {
        return Err(LoadError::invalid(
            "cache.speaker_ttl_seconds",
            "must be greater than zero",
        ));
    }
    let ttl_seconds: i64 = ttl_seconds.try_into().map_err(|_| {
        LoadError::invalid(
            "cache.speaker_ttl_seconds",
            "value exceeds supported range",
        )
    })?;

    Ok(CacheSettings {
        speaker_ttl: time::Duration::seconds(ttl_seconds),
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
struct RawPretalxSettings {
    api_token: Option<String>,
    base_url: Option<String>,
    event_slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    speaker_ttl_seconds: Option<u64>,
}
