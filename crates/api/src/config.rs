use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

pub use persistence::db::DatabaseConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub gatherings: GatheringsConfig,
    /// Comment summarization service; an empty `api_key` disables it.
    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Only enable behind TLS termination.
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatheringsConfig {
    /// Maximum rows returned by title search.
    #[serde(default = "default_search_limit")]
    pub search_limit: i64,

    /// Offset used for dates submitted without one (browser `datetime-local`).
    #[serde(default = "default_timezone_offset_hours")]
    pub timezone_offset_hours: i32,
}

impl Default for GatheringsConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            timezone_offset_hours: default_timezone_offset_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_summary_api_url")]
    pub api_url: String,

    #[serde(default = "default_summary_model")]
    pub model: String,

    #[serde(default = "default_summary_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_summary_timeout_ms")]
    pub timeout_ms: u64,

    /// Value of the `anthropic-version` header.
    #[serde(default = "default_summary_api_version")]
    pub api_version: String,
}

impl SummaryConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_summary_api_url(),
            model: default_summary_model(),
            max_tokens: default_summary_max_tokens(),
            timeout_ms: default_summary_timeout_ms(),
            api_version: default_summary_api_version(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_search_limit() -> i64 {
    10
}
fn default_timezone_offset_hours() -> i32 {
    9
}
fn default_summary_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}
fn default_summary_model() -> String {
    "claude-3-5-sonnet-latest".to_string()
}
fn default_summary_max_tokens() -> u32 {
    200
}
fn default_summary_timeout_ms() -> u64 {
    15000
}
fn default_summary_api_version() -> String {
    "2023-06-01".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml
    /// 2. config/local.toml (optional, not in git)
    /// 3. Environment variables with HS__ prefix, e.g. `HS__SUMMARY__API_KEY`
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("HS").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 10
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            hsts_enabled = false

            [gatherings]
            search_limit = 10
            timezone_offset_hours = 9

            [summary]
            api_key = ""
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "HS__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.socket_addr().is_err() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Server host is not a valid IP address: {}",
                self.server.host
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.gatherings.search_limit < 1 {
            return Err(ConfigValidationError::InvalidValue(
                "gatherings.search_limit must be at least 1".to_string(),
            ));
        }

        if !(-14..=14).contains(&self.gatherings.timezone_offset_hours) {
            return Err(ConfigValidationError::InvalidValue(
                "gatherings.timezone_offset_hours must be between -14 and 14".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
