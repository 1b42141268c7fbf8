use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub weather: WeatherSettings,
    pub openai: OpenAiSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
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
pub struct WeatherSettings {
    pub api_key: String,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_forecast_days() -> u8 {
    7
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_access_ttl_secs() -> u64 {
    3600
}

fn default_refresh_ttl_secs() -> u64 {
    30 * 24 * 3600
}

fn default_bcrypt_cost() -> u32 {
    12
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_style_weight")]
    pub style: f64,
    #[serde(default = "default_difficulty_weight")]
    pub difficulty: f64,
    #[serde(default = "default_social_weight")]
    pub social: f64,
    #[serde(default = "default_conditions_weight")]
    pub conditions: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            style: default_style_weight(),
            difficulty: default_difficulty_weight(),
            social: default_social_weight(),
            conditions: default_conditions_weight(),
        }
    }
}

fn default_style_weight() -> f64 {
    0.3
}
fn default_difficulty_weight() -> f64 {
    0.3
}
fn default_social_weight() -> f64 {
    0.2
}
fn default_conditions_weight() -> f64 {
    0.2
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> u16 {
    5
}

fn default_max_limit() -> u16 {
    20
}

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

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides
    /// earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with GOLF__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("GOLF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GOLF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed environment variables
/// (DATABASE_URL, WEATHER_API_KEY, OPENAI_API_KEY, JWT_SECRET)
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(api_key) = env::var("WEATHER_API_KEY") {
        builder = builder.set_override("weather.api_key", api_key)?;
    }
    if let Ok(api_key) = env::var("OPENAI_API_KEY") {
        builder = builder.set_override("openai.api_key", api_key)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.style, 0.3);
        assert_eq!(weights.difficulty, 0.3);
        assert_eq!(weights.social, 0.2);
        assert_eq!(weights.conditions, 0.2);
    }

    #[test]
    fn test_default_recommendation_limits() {
        let rec = RecommendationSettings::default();
        assert_eq!(rec.default_limit, 5);
        assert_eq!(rec.max_limit, 20);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
