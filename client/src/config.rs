//! Environment-driven client configuration.
//!
//! Settings are read through a [`mockable::Env`] capability so parsing can be
//! tested without touching the process environment.

use chrono::TimeDelta;
use mockable::Env;
use url::Url;

use crate::domain::DEFAULT_CACHE_DURATION;

/// Base URL used when `INKTRACK_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

const API_BASE_ENV: &str = "INKTRACK_API_BASE";
const CACHE_DURATION_ENV: &str = "INKTRACK_CACHE_DURATION_SECS";

/// Errors raised while reading client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The base URL variable does not parse as an absolute URL.
    #[error("invalid value for {API_BASE_ENV}='{value}': {message}")]
    InvalidBaseUrl { value: String, message: String },
    /// The cache duration variable is not a positive integer.
    #[error("invalid value for {CACHE_DURATION_ENV}='{value}'; expected a positive integer of seconds")]
    InvalidCacheDuration { value: String },
}

/// Validated client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    cache_duration: TimeDelta,
}

impl ApiConfig {
    /// Build a configuration from explicit values.
    #[must_use]
    pub fn new(base_url: Url, cache_duration: TimeDelta) -> Self {
        Self {
            base_url,
            cache_duration,
        }
    }

    /// Read configuration from the environment, applying defaults for unset
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but invalid.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        let base_url = base_url_from_env(env)?;
        let cache_duration = cache_duration_from_env(env)?;
        Ok(Self {
            base_url,
            cache_duration,
        })
    }

    /// Base URL all relative request paths are appended to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Staleness window applied to cached endpoint bindings.
    #[must_use]
    pub fn cache_duration(&self) -> TimeDelta {
        self.cache_duration
    }
}

fn base_url_from_env<E: Env>(env: &E) -> Result<Url, ConfigError> {
    let raw = env
        .string(API_BASE_ENV)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
    // Paths arrive with a leading slash; a trailing slash here would double up.
    let trimmed = raw.trim_end_matches('/');
    Url::parse(trimmed).map_err(|error| ConfigError::InvalidBaseUrl {
        value: raw.clone(),
        message: error.to_string(),
    })
}

fn cache_duration_from_env<E: Env>(env: &E) -> Result<TimeDelta, ConfigError> {
    let Some(raw) = env.string(CACHE_DURATION_ENV) else {
        return Ok(DEFAULT_CACHE_DURATION);
    };
    match raw.trim().parse::<i64>() {
        Ok(seconds) if seconds > 0 => Ok(TimeDelta::seconds(seconds)),
        _ => Err(ConfigError::InvalidCacheDuration { value: raw }),
    }
}
