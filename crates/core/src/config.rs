use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::i18n::Locale;

pub const DEFAULT_BASE_URL: &str = "https://rajaongkir.komerce.id/api/v1";
pub const DEFAULT_LOCATION_CACHE_MINUTES: u64 = 1440;
pub const DEFAULT_COST_CACHE_MINUTES: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub api_key: Secret<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Minutes. Zero falls back to the default.
    #[serde(default = "default_location_cache_duration")]
    pub location_cache_duration: u64,
    /// Minutes. Zero falls back to the default.
    #[serde(default = "default_cost_cache_duration")]
    pub cost_cache_duration: u64,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Use a Redis cache instead of the in-memory one.
    #[serde(default)]
    pub redis_url: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_location_cache_duration() -> u64 {
    DEFAULT_LOCATION_CACHE_MINUTES
}

fn default_cost_cache_duration() -> u64 {
    DEFAULT_COST_CACHE_MINUTES
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ClientConfig {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: default_base_url(),
            location_cache_duration: DEFAULT_LOCATION_CACHE_MINUTES,
            cost_cache_duration: DEFAULT_COST_CACHE_MINUTES,
            locale: Locale::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            redis_url: None,
        }
    }

    /// Load from `config/rajaongkir.*` (optional) and `RAJAONGKIR_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config/rajaongkir").required(false))
            // Map RAJAONGKIR_API_KEY=... to api_key
            .add_source(Environment::with_prefix("RAJAONGKIR"))
            .build()?;

        let cfg: Self = s.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::Message("api_key must not be empty".into()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Message(format!("invalid base_url '{}': {}", self.base_url, e)))?;
        Ok(())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    pub fn location_cache_ttl(&self) -> Duration {
        minutes_or_default(self.location_cache_duration, DEFAULT_LOCATION_CACHE_MINUTES)
    }

    pub fn cost_cache_ttl(&self) -> Duration {
        minutes_or_default(self.cost_cache_duration, DEFAULT_COST_CACHE_MINUTES)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn minutes_or_default(minutes: u64, default: u64) -> Duration {
    let minutes = if minutes > 0 { minutes } else { default };
    Duration::from_secs(minutes.saturating_mul(60))
}
