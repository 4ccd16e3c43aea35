use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use crate::core::FilterDefaults;
use crate::models::{ScoreWeights, WeightBounds};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// CORS origins; empty means permissive
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_allowed_origins() -> Vec<String> { vec!["http://localhost:3000".to_string()] }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout() -> u64 { 5 }
fn default_idle_timeout() -> u64 { 600 }
fn default_query_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_limit")]
    pub max_limit: usize,
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_limit(),
            default_radius_km: default_radius_km(),
        }
    }
}

fn default_limit() -> usize { 5000 }
fn default_radius_km() -> f64 { 10.0 }

impl QuerySettings {
    pub fn filter_defaults(&self) -> FilterDefaults {
        FilterDefaults {
            proximity_radius_km: self.default_radius_km,
            result_limit: self.default_limit,
            max_result_limit: self.max_limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_min_weight")]
    pub min_weight: i32,
    #[serde(default = "default_max_weight")]
    pub max_weight: i32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            min_weight: default_min_weight(),
            max_weight: default_max_weight(),
        }
    }
}

fn default_min_weight() -> i32 { 1 }
fn default_max_weight() -> i32 { 3 }

impl ScoringSettings {
    pub fn default_weights(&self) -> ScoreWeights {
        ScoreWeights {
            health: self.weights.health,
            commerce: self.weights.commerce,
            association: self.weights.association,
            sunshine: self.weights.sunshine,
            sunshine_preference: None,
        }
    }

    pub fn bounds(&self) -> WeightBounds {
        WeightBounds {
            min: self.min_weight,
            max: self.max_weight,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_health_weight")]
    pub health: i32,
    #[serde(default = "default_commerce_weight")]
    pub commerce: i32,
    #[serde(default = "default_association_weight")]
    pub association: i32,
    #[serde(default = "default_sunshine_weight")]
    pub sunshine: i32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            health: default_health_weight(),
            commerce: default_commerce_weight(),
            association: default_association_weight(),
            sunshine: default_sunshine_weight(),
        }
    }
}

fn default_health_weight() -> i32 { 1 }
fn default_commerce_weight() -> i32 { 1 }
fn default_association_weight() -> i32 { 1 }
fn default_sunshine_weight() -> i32 { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 { 3600 }
fn default_cache_capacity() -> u64 { 16 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RETRAITE_)
    /// 5. DATABASE_URL, or the POSTGRES_* variables
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RETRAITE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RETRAITE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_database_url(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }
}

/// Resolve the database URL from the environment
///
/// `DATABASE_URL` wins. Otherwise, if any `POSTGRES_*` variable is set, the
/// URL is assembled from them with the same defaults as the import step
/// (postgres/postgres@localhost:5432/retraite). With neither, the URL from
/// the config sources is kept.
fn apply_database_url<F>(settings: Config, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = env("DATABASE_URL").or_else(|| {
        let parts = ["POSTGRES_USER", "POSTGRES_PASSWORD", "POSTGRES_HOST", "POSTGRES_PORT", "POSTGRES_DB"]
            .map(|name| env(name));
        if parts.iter().all(Option::is_none) {
            return None;
        }
        let [user, password, host, port, db] = parts;
        Some(format!(
            "postgres://{}:{}@{}:{}/{}",
            user.unwrap_or_else(|| "postgres".to_string()),
            password.unwrap_or_else(|| "postgres".to_string()),
            host.unwrap_or_else(|| "localhost".to_string()),
            port.unwrap_or_else(|| "5432".to_string()),
            db.unwrap_or_else(|| "retraite".to_string()),
        ))
    });

    match url {
        Some(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        None => Ok(settings),
    }
}
