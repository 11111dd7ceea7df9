//! Configuration management for the Evacuation Map Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with EVAC_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// PostgreSQL configuration, required when zones are read from the database
    pub database: Option<DatabaseConfig>,

    /// Where evacuation zones are read from
    pub zone_source: ZoneSourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

/// Backend holding the `evacuation_zones` table
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneSourceKind {
    /// Hosted PostgREST endpoint (e.g. Supabase)
    Rest,
    /// Direct PostgreSQL connection
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ZoneSourceConfig {
    pub kind: ZoneSourceKind,

    /// Project URL of the PostgREST service, e.g. https://your-project.supabase.co
    pub rest_url: Option<String>,

    /// Anonymous API key for the PostgREST service
    pub api_key: Option<String>,

    /// Per-request timeout for zone queries
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("EVAC_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("zone_source.kind", "rest")?
            .set_default("zone_source.request_timeout_secs", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (EVAC_ prefix)
            .add_source(
                Environment::with_prefix("EVAC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: None,
            zone_source: ZoneSourceConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ZoneSourceConfig {
    fn default() -> Self {
        Self {
            kind: ZoneSourceKind::Rest,
            rest_url: None,
            api_key: None,
            request_timeout_secs: 10,
        }
    }
}
