use ingest::IngestConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{ServerError, ServerResult};
use crate::sink::TableRef;

/// Plain environment variable naming the destination table. Checked when
/// `SALESGATE__BQ_TABLE` and the config file leave `bq_table` unset.
pub const BQ_TABLE_ENV: &str = "BQ_TABLE";

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS. When on, `OPTIONS` preflights are answered by the CORS
    /// layer instead of the route handlers.
    #[serde(default)]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Destination table, `project.dataset.table`. `None` runs validate-only.
    #[serde(default)]
    pub bq_table: Option<String>,

    /// BigQuery client settings
    #[serde(default)]
    pub bigquery: BigQueryConfig,

    /// Pipeline settings (tax rate, item policy)
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Connection settings for the BigQuery streaming insert API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BigQueryConfig {
    /// API root, overridable for emulators
    #[serde(default = "default_bigquery_endpoint")]
    pub endpoint: String,

    /// OAuth2 bearer token sent with each insert
    #[serde(default)]
    pub access_token: Option<String>,

    /// Per-insert timeout in seconds
    #[serde(default = "default_bigquery_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BigQueryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_bigquery_endpoint(),
            access_token: None,
            timeout_secs: default_bigquery_timeout_secs(),
        }
    }
}

impl BigQueryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: false,
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            bq_table: None,
            bigquery: BigQueryConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `salesgate` config file,
    /// and `SALESGATE__*` environment variables, in increasing precedence.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("salesgate").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("SALESGATE").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.bq_table.is_none() {
            config.bq_table = std::env::var(BQ_TABLE_ENV).ok();
        }
        config.bq_table = config
            .bq_table
            .take()
            .map(|table| table.trim().to_string())
            .filter(|table| !table.is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Check the table name shape and the pipeline settings.
    pub fn validate(&self) -> ServerResult<()> {
        if let Some(table) = &self.bq_table {
            TableRef::parse(table)?;
        }
        self.ingest
            .validate()
            .map_err(|err| ServerError::Config(err.to_string()))?;
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bigquery_endpoint() -> String {
    "https://bigquery.googleapis.com/bigquery/v2".to_string()
}

fn default_bigquery_timeout_secs() -> u64 {
    10
}
