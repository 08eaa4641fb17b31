use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub auth: AuthSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Smart Match weight table. The defaults award at most 100 points:
/// 40 event type + 30 location + 20 budget + 8 rating + 2 reviews.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_event_type_weight")]
    pub event_type: f64,
    #[serde(default = "default_location_full_weight")]
    pub location_full: f64,
    #[serde(default = "default_location_partial_weight")]
    pub location_partial: f64,
    #[serde(default = "default_budget_in_range_weight")]
    pub budget_in_range: f64,
    #[serde(default = "default_budget_stretch_weight")]
    pub budget_stretch: f64,
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_reviews_weight")]
    pub reviews: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            event_type: default_event_type_weight(),
            location_full: default_location_full_weight(),
            location_partial: default_location_partial_weight(),
            budget_in_range: default_budget_in_range_weight(),
            budget_stretch: default_budget_stretch_weight(),
            rating: default_rating_weight(),
            reviews: default_reviews_weight(),
        }
    }
}

fn default_event_type_weight() -> f64 { 40.0 }
fn default_location_full_weight() -> f64 { 30.0 }
fn default_location_partial_weight() -> f64 { 15.0 }
fn default_budget_in_range_weight() -> f64 { 20.0 }
fn default_budget_stretch_weight() -> f64 { 10.0 }
fn default_rating_weight() -> f64 { 8.0 }
fn default_reviews_weight() -> f64 { 2.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with UTSAV_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with UTSAV_)
            // e.g., UTSAV_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("UTSAV")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("UTSAV")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional deployment variables that don't carry the UTSAV_
/// prefix: DATABASE_URL, REDIS_URL and JWT_SECRET.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }
    if let Ok(jwt_secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", jwt_secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.event_type, 40.0);
        assert_eq!(weights.location_full, 30.0);
        assert_eq!(weights.location_partial, 15.0);
        assert_eq!(weights.budget_in_range, 20.0);
        assert_eq!(weights.budget_stretch, 10.0);
        assert_eq!(weights.rating, 8.0);
        assert_eq!(weights.reviews, 2.0);
    }

    #[test]
    fn test_default_weights_cap_at_100() {
        let weights = WeightsConfig::default();
        let maximum =
            weights.event_type + weights.location_full + weights.budget_in_range + weights.rating + weights.reviews;
        assert_eq!(maximum, 100.0);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
