//! Runtime configuration.
//!
//! Every setting resolves through the same chain: explicit flag, then the
//! matching `MERIDIAN_*` environment variable, then the built-in default.
//! Resolution happens once at startup; the resolved [`Config`] is immutable
//! afterwards and shared behind the application state.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SITE_NAME: &str = "Meridian Travel";
const DEFAULT_CURRENCY: &str = "GBP";
const DEFAULT_SECONDARY_CURRENCY: &str = "USD";
const DEFAULT_TEMPLATE: &str = "dist/index.html";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MOUNT_ID: &str = "app";
const DEFAULT_TOUR_API_TIMEOUT_MS: u64 = 10_000;

/// Production responses are cached this long unless overridden.
const PRODUCTION_CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }

    fn parse(text: &str) -> Result<Self> {
        match text.to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => bail!("unknown environment {other:?} (expected production or development)"),
        }
    }
}

/// Command-line surface, flattened into `meridian serve`.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Public origin for canonical URLs, e.g. https://www.example.com
    #[arg(long)]
    pub base_url: Option<String>,

    /// Site name used in titles and structured data
    #[arg(long)]
    pub site_name: Option<String>,

    /// production serves injected pages to everyone and enables the cache
    #[arg(long, value_enum)]
    pub environment: Option<Environment>,

    /// Preferred currency for tour snapshots and live lookups
    #[arg(long)]
    pub currency: Option<String>,

    /// Fallback currency when the preferred snapshot has no entry
    #[arg(long)]
    pub secondary_currency: Option<String>,

    /// SPA shell template, re-read on every injected response
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Directory of built SPA assets to serve directly
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Directory of prerendered page snapshots
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Directory holding packages.json, posts.json, faqs.json and
    /// products.<currency>.json
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Response-cache TTL in seconds; 0 disables caching
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// Live tour API origin; omit to run without the live tier
    #[arg(long)]
    pub tour_api_url: Option<String>,

    /// Timeout for live tour lookups, in milliseconds
    #[arg(long)]
    pub tour_api_timeout_ms: Option<u64>,

    /// id of the SPA mount element in the template
    #[arg(long)]
    pub mount_id: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub site_name: String,
    pub environment: Environment,
    pub currency: String,
    pub secondary_currency: String,
    pub template_path: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub snapshot_dir: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub cache_ttl: Option<Duration>,
    pub tour_api_url: Option<String>,
    pub tour_api_timeout: Duration,
    pub mount_id: String,
}

impl Config {
    pub fn resolve(args: ConfigArgs) -> Result<Self> {
        let base_url = args
            .base_url
            .or_else(|| env_string("MERIDIAN_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = validate_origin(&base_url)?;

        let environment = match args.environment {
            Some(environment) => environment,
            None => match env_string("MERIDIAN_ENV") {
                Some(text) => Environment::parse(&text).context("reading MERIDIAN_ENV")?,
                None => Environment::Development,
            },
        };

        let cache_ttl_secs = match args.cache_ttl_secs {
            Some(secs) => Some(secs),
            None => env_string("MERIDIAN_CACHE_TTL_SECS")
                .map(|v| v.parse().context("MERIDIAN_CACHE_TTL_SECS must be a number"))
                .transpose()?,
        };
        let cache_ttl = resolved_ttl(cache_ttl_secs, environment);

        let port = match args.port {
            Some(port) => port,
            None => env_string("MERIDIAN_PORT")
                .map(|v| v.parse().context("MERIDIAN_PORT must be a port number"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),
        };

        let tour_api_url = args
            .tour_api_url
            .or_else(|| env_string("MERIDIAN_TOUR_API_URL"))
            .map(|url| validate_origin(&url))
            .transpose()?;

        let tour_api_timeout_ms = match args.tour_api_timeout_ms {
            Some(ms) => ms,
            None => env_string("MERIDIAN_TOUR_API_TIMEOUT_MS")
                .map(|v| v.parse().context("MERIDIAN_TOUR_API_TIMEOUT_MS must be a number"))
                .transpose()?
                .unwrap_or(DEFAULT_TOUR_API_TIMEOUT_MS),
        };

        Ok(Self {
            base_url,
            site_name: args
                .site_name
                .or_else(|| env_string("MERIDIAN_SITE_NAME"))
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            environment,
            currency: args
                .currency
                .or_else(|| env_string("MERIDIAN_CURRENCY"))
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
                .to_uppercase(),
            secondary_currency: args
                .secondary_currency
                .or_else(|| env_string("MERIDIAN_SECONDARY_CURRENCY"))
                .unwrap_or_else(|| DEFAULT_SECONDARY_CURRENCY.to_string())
                .to_uppercase(),
            template_path: args
                .template
                .or_else(|| env_path("MERIDIAN_TEMPLATE"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE)),
            static_dir: args.static_dir.or_else(|| env_path("MERIDIAN_STATIC_DIR")),
            snapshot_dir: args.snapshot_dir.or_else(|| env_path("MERIDIAN_SNAPSHOT_DIR")),
            data_dir: args
                .data_dir
                .or_else(|| env_path("MERIDIAN_DATA_DIR"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            host: args
                .host
                .or_else(|| env_string("MERIDIAN_HOST"))
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            cache_ttl,
            tour_api_url,
            tour_api_timeout: Duration::from_millis(tour_api_timeout_ms),
            mount_id: args
                .mount_id
                .or_else(|| env_string("MERIDIAN_MOUNT_ID"))
                .unwrap_or_else(|| DEFAULT_MOUNT_ID.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Explicit TTL wins (0 disables); otherwise production caches 12 hours
/// and everything else runs uncached.
fn resolved_ttl(explicit_secs: Option<u64>, environment: Environment) -> Option<Duration> {
    match explicit_secs {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None if environment.is_production() => Some(PRODUCTION_CACHE_TTL),
        None => None,
    }
}

/// Require an absolute http(s) origin; the trailing slash is dropped so
/// path concatenation stays predictable.
fn validate_origin(url: &str) -> Result<String> {
    let parsed = Url::parse(url).with_context(|| format!("invalid URL {url:?}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("URL {url:?} must use http or https");
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_path(name: &str) -> Option<PathBuf> {
    env_string(name).map(PathBuf::from)
}
