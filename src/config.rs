//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `SALESBOARD_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analytics::{DEFAULT_PER_PAGE, DEFAULT_REFERENCE_YEAR};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which record store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("salesboard").join("sales.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./salesboard_data/sales.db".to_string())
}

impl StorageConfig {
    /// Database path with a leading `~/` expanded to the home directory
    pub fn resolved_db_path(&self) -> PathBuf {
        match (self.db_path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.db_path),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            db_path: default_db_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Dashboard query configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyticsConfig {
    /// Year every month name resolves into
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,

    #[serde(default = "default_per_page")]
    pub default_per_page: i64,

    #[serde(default = "default_max_per_page")]
    pub max_per_page: i64,

    /// Upper bound on each individual store query
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,
}

fn default_reference_year() -> i32 {
    DEFAULT_REFERENCE_YEAR
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

fn default_max_per_page() -> i64 {
    100
}

fn default_query_timeout() -> u64 {
    5000 // 5 seconds
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            reference_year: default_reference_year(),
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            query_timeout_ms: default_query_timeout(),
        }
    }
}

/// Seed import configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_import_enabled")]
    pub enabled: bool,

    #[serde(default = "default_source_url")]
    pub source_url: String,

    #[serde(default = "default_import_timeout")]
    pub timeout_secs: u64,

    /// Import once at server startup if the store holds no records
    #[serde(default)]
    pub seed_on_empty: bool,
}

fn default_import_enabled() -> bool {
    true
}

fn default_source_url() -> String {
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json".to_string()
}

fn default_import_timeout() -> u64 {
    30
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            enabled: default_import_enabled(),
            source_url: default_source_url(),
            timeout_secs: default_import_timeout(),
            seed_on_empty: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("salesboard").join("config.toml")),
            Some(PathBuf::from("/etc/salesboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `SALESBOARD_*` overrides from any key lookup
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Storage overrides
        if let Some(path) = lookup("SALESBOARD_DB_PATH") {
            self.storage.db_path = path;
        }
        if let Some(backend) = lookup("SALESBOARD_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(b) => self.storage.backend = b,
                Err(e) => tracing::warn!("Ignoring SALESBOARD_STORAGE_BACKEND: {}", e),
            }
        }

        // API overrides
        if let Some(host) = lookup("SALESBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("SALESBOARD_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring SALESBOARD_API_PORT: '{}' is not a port", port),
            }
        }

        // Analytics overrides
        if let Some(year) = lookup("SALESBOARD_REFERENCE_YEAR") {
            match year.parse() {
                Ok(y) => self.analytics.reference_year = y,
                Err(_) => tracing::warn!("Ignoring SALESBOARD_REFERENCE_YEAR: '{}' is not a year", year),
            }
        }

        // Import overrides
        if let Some(url) = lookup("SALESBOARD_SEED_URL") {
            self.import.source_url = url;
        }

        // Logging overrides
        if let Some(level) = lookup("SALESBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SALESBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Socket address string for the API server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Salesboard Configuration
#
# Environment variables override these settings:
# - SALESBOARD_DB_PATH
# - SALESBOARD_STORAGE_BACKEND
# - SALESBOARD_API_HOST
# - SALESBOARD_API_PORT
# - SALESBOARD_SEED_URL
# - SALESBOARD_REFERENCE_YEAR
# - SALESBOARD_LOG_LEVEL
# - SALESBOARD_LOG_FORMAT

[storage]
# Record store: "sqlite" (persistent) or "memory" (lost on restart)
backend = "sqlite"

# SQLite database file
db_path = "~/.local/share/salesboard/sales.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 3001

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

[analytics]
# Year that month names resolve into
reference_year = 2023

# Page size when perPage is not given
default_per_page = 10

# Largest accepted perPage
max_per_page = 100

# Timeout for each individual store query (ms)
query_timeout_ms = 5000

[import]
# Allow the seed endpoint to replace the store contents
enabled = true

# JSON array of sale records
source_url = "https://s3.amazonaws.com/roxiler.com/product_transaction.json"

# Fetch timeout in seconds
timeout_secs = 30

# Seed at startup when the store is empty
seed_on_empty = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
