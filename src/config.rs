//! Configuration management for aggregates.

use crate::{AggregateError, AggregateResult, SizeKind};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration for an aggregate and its writer
///
/// # Structure
/// - `name`: label attached to logs and metrics
/// - `limits`: admission policy of the batch
/// - `retry`: how the writer retries a failing sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Aggregate name (from AGGREGATE_NAME env var when set)
    #[serde(default = "default_name")]
    pub name: String,

    /// Admission limits
    #[serde(default)]
    pub limits: LimitSettings,

    /// Sink retry settings
    #[serde(default)]
    pub retry: RetrySettings,

    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AggregateConfig {
    /// Build a configuration from defaults plus environment overrides
    ///
    /// Reads `AGGREGATE_NAME`, `AGGREGATE_MAX_COUNT`, `AGGREGATE_MAX_SIZE`,
    /// `AGGREGATE_MAX_AGE_MS` and `AGGREGATE_SIZE_KIND`.
    pub fn from_env() -> AggregateResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> AggregateResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AggregateError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            AggregateError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Apply environment variable overrides
    ///
    /// Unset variables leave the current value alone; unparsable ones are an error.
    pub fn apply_env_overrides(&mut self) -> AggregateResult<()> {
        if let Ok(val) = env::var("AGGREGATE_NAME") {
            self.name = val;
        }
        if let Some(val) = parse_env::<usize>("AGGREGATE_MAX_COUNT")? {
            self.limits.max_count = val;
        }
        if let Some(val) = parse_env::<usize>("AGGREGATE_MAX_SIZE")? {
            self.limits.max_size = val;
        }
        if let Some(val) = parse_env::<u64>("AGGREGATE_MAX_AGE_MS")? {
            self.limits.max_age_ms = Some(val);
        }
        if let Ok(val) = env::var("AGGREGATE_SIZE_KIND") {
            self.limits.size_kind = val;
        }
        Ok(())
    }

    /// Validate the configuration
    ///
    /// This is the eager counterpart of the lazy size-kind check in
    /// `BoundedBatch::add`.
    pub fn validate(&self) -> AggregateResult<()> {
        if self.name.is_empty() {
            return Err(AggregateError::config("name cannot be empty"));
        }

        self.limits.size_kind()?;

        if self.retry.max_retries > 100 {
            return Err(AggregateError::config("max_retries too high (max 100)"));
        }

        if self.retry.retry_backoff_ms > self.retry.max_backoff_ms {
            return Err(AggregateError::config(
                "retry_backoff_ms cannot exceed max_backoff_ms",
            ));
        }

        Ok(())
    }

    /// Initialize tracing/logging
    ///
    /// `RUST_LOG` wins over `log_level`. Safe to call more than once.
    pub fn init_tracing(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.log_level));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .ok(); // Ignore if already initialized
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            limits: LimitSettings::default(),
            retry: RetrySettings::default(),
            log_level: default_log_level(),
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> AggregateResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AggregateError::config(format!("{} is invalid ('{}'): {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}

fn default_name() -> String {
    "default-aggregate".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Admission limits of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitSettings {
    /// Maximum number of buffered items
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Maximum cumulative size in bytes
    #[serde(default = "default_max_size")]
    pub max_size: usize,

    /// Idle window in milliseconds; absent means no time bound
    #[serde(default)]
    pub max_age_ms: Option<u64>,

    /// Size strategy name: `raw-length` (alias `raw`, `len`) or `json-length` (alias `json`)
    ///
    /// Kept as a string so that an unknown name surfaces from the first add
    /// rather than from deserialization.
    #[serde(default = "default_size_kind")]
    pub size_kind: String,
}

impl LimitSettings {
    /// Parsed size strategy
    pub fn size_kind(&self) -> AggregateResult<SizeKind> {
        self.size_kind.parse()
    }

    /// Idle window as a `Duration`
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_ms.map(Duration::from_millis)
    }
}

fn default_max_count() -> usize {
    1000
}
fn default_max_size() -> usize {
    1024 * 1024
}
fn default_size_kind() -> String {
    SizeKind::RawLength.as_str().to_string()
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
            max_size: default_max_size(),
            max_age_ms: None,
            size_kind: default_size_kind(),
        }
    }
}

/// Retry configuration for sink writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum number of retries for a failed batch write
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff duration in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    1000
}
fn default_max_backoff_ms() -> u64 {
    30000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}
